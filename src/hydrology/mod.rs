//! Гидрология доски: океан, побережье, стоковый лес и реки.
//!
//! Четыре фазы выполняются строго по порядку над общими аренами сетки:
//!
//! 1. заливка океана от затравочного тайла ([`sea`]);
//! 2. рост прибрежных меток с резкой каналов ([`coast`]);
//! 3. поиск пиков и построение леса наискорейшего спуска ([`flow`]);
//! 4. синтез рек с накоплением и испарением объёма ([`rivers`]).
//!
//! Каждая следующая фаза опирается на завершённые инварианты предыдущей,
//! поэтому порядок менять нельзя.

pub mod coast;
pub mod flow;
pub mod rivers;
pub mod sea;

pub use rivers::River;

use crate::grid::{HexGrid, NodeId, TileId};

/// Результат гидрологических фаз поверх сетки.
#[derive(Debug)]
pub struct Hydrology {
    /// Маска океанских тайлов по арене.
    pub ocean_tiles: Vec<bool>,
    /// Маска океанских вершин: исключены из пиков и стока.
    pub ocean_nodes: Vec<bool>,
    /// Прибрежная метка: число шагов BFS от океана, начиная с 1.
    pub coast: Vec<Option<u32>>,
    /// Вершины без более высоких соседей, истоки рек.
    pub peaks: Vec<NodeId>,
    /// Зарегистрированные реки в порядке возрастания устья.
    pub rivers: Vec<River>,
}

impl Hydrology {
    fn empty(grid: &HexGrid) -> Hydrology {
        Hydrology {
            ocean_tiles: vec![false; grid.tiles.len()],
            ocean_nodes: vec![false; grid.nodes.len()],
            coast: vec![None; grid.tiles.len()],
            peaks: Vec::new(),
            rivers: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_ocean_tile(&self, id: TileId) -> bool {
        self.ocean_tiles[id.0 as usize]
    }

    #[must_use]
    pub fn is_ocean_node(&self, id: NodeId) -> bool {
        self.ocean_nodes[id.0 as usize]
    }

    /// Прибрежная метка тайла, если фаза роста его достигла.
    #[must_use]
    pub fn coast_distance(&self, id: TileId) -> Option<u32> {
        self.coast[id.0 as usize]
    }
}

/// Прогоняет все фазы. Затравка заливки — первый построенный тайл,
/// западный угол доски; если он не находит воды, последующие фазы
/// вырождаются без ошибок.
pub fn generate(grid: &mut HexGrid) -> Hydrology {
    let mut hydro = Hydrology::empty(grid);
    if grid.tiles.is_empty() {
        return hydro;
    }

    sea::fill_sea(grid, &mut hydro, TileId(0));
    println!(
        "  Океан: {} тайлов, начальное побережье: {}",
        hydro.ocean_tiles.iter().filter(|&&o| o).count(),
        hydro.coast.iter().filter(|c| c.is_some()).count()
    );

    coast::make_coast(grid, &mut hydro);
    println!(
        "  Побережье размечено: {} тайлов",
        hydro.coast.iter().filter(|c| c.is_some()).count()
    );

    flow::find_peaks(grid, &mut hydro);
    println!("  Пиков найдено: {}", hydro.peaks.len());

    rivers::make_rivers(grid, &mut hydro);
    println!("  Рек зарегистрировано: {}", hydro.rivers.len());

    hydro
}
