use clap::Parser;
use hexboard::{Axial, Board, BoardParams, Traversal};
use std::fs;
use std::path::PathBuf;

/// Генератор гексагональных островных досок
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Зерно генератора; без него разыгрывается случайное
    #[arg(long)]
    seed: Option<u64>,

    /// Радиус доски в кольцах
    #[arg(long)]
    rings: Option<i32>,

    /// Ширина шумового поля в пикселях
    #[arg(long)]
    width: Option<u32>,

    /// Высота шумового поля в пикселях
    #[arg(long)]
    height: Option<u32>,

    /// Путь для сохранения отчёта в JSON
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Проверить судоходность кольца: маршрут по воде с запада на восток
    #[arg(long)]
    check_channel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации...");
            BoardParams::from_toml_file(path)?
        }
        None => BoardParams::default(),
    };
    // Флаги командной строки сильнее файла.
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }
    if let Some(rings) = cli.rings {
        params.rings = rings;
    }
    if let Some(width) = cli.width {
        params.width = width;
    }
    if let Some(height) = cli.height {
        params.height = height;
    }

    println!(
        "Генерация доски: {} колец, поле {}×{}...",
        params.rings, params.width, params.height
    );
    let board = Board::new(&params)?;
    println!("Зерно: {}", board.seed());

    if cli.check_channel {
        let rings = board.rings();
        let west = Axial::new(-rings, 0);
        let east = Axial::new(rings, 0);
        match board.path(west, east, Traversal::Water) {
            Some(route) => println!("Канал запад-восток: {} тайлов", route.len()),
            None => println!("Канал запад-восток не найден"),
        }
    }

    if let Some(path) = &cli.report {
        fs::write(path, serde_json::to_string_pretty(&board.report())?)?;
        println!("Отчёт сохранён в {:?}", path);
    }

    println!("\nГотово!");
    Ok(())
}
