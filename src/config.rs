// src/config.rs
//! Параметры генерации доски.
//!
//! Все поля имеют значения по умолчанию, поэтому конфигурация может быть
//! пустой или частичной. Флаги командной строки перекрывают файл.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

/// Параметры одной доски.
///
/// # Пример
/// ```toml
/// # board.toml
/// seed = 12345
/// rings = 20
/// width = 800
/// height = 800
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardParams {
    /// Зерно генератора. Без него зерно разыгрывается из системной
    /// энтропии и запоминается на доске.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Число колец гексагональной доски (центральный тайл — кольцо ноль).
    #[serde(default = "default_rings")]
    pub rings: i32,

    /// Ширина шумового поля в пикселях.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота шумового поля в пикселях.
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_rings() -> i32 {
    20
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    800
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            seed: None,
            rings: default_rings(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl BoardParams {
    /// Загружает параметры из TOML-файла.
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}
