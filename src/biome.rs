//! Классификация биомов по высоте и влажности тайла.

use crate::board::{ALPINE_LEVEL, DESERT_MOISTURE, SEA_LEVEL};
use serde::{Deserialize, Serialize};

/// Биом тайла.
///
/// `Beach` зарезервирован схемой порогов, но ни одна комбинация высоты и
/// влажности его не даёт.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    DeepWater,
    ShallowWater,
    Beach,
    Forest,
    Jungle,
    Plain,
    Tundra,
    Alpine,
}

impl Biome {
    /// Имя варианта для сводок и отчётов.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Biome::DeepWater => "DeepWater",
            Biome::ShallowWater => "ShallowWater",
            Biome::Beach => "Beach",
            Biome::Forest => "Forest",
            Biome::Jungle => "Jungle",
            Biome::Plain => "Plain",
            Biome::Tundra => "Tundra",
            Biome::Alpine => "Alpine",
        }
    }
}

/// Пороговая классификация. Вода делится по доле уровня моря; на суше
/// сначала проверяется тундровый круг радиуса 30 вокруг точки
/// (`DESERT_MOISTURE`, `ALPINE_LEVEL`) в координатах (влажность, высота),
/// затем высокогорье и пороги джунглей и леса.
#[must_use]
pub fn classify(height: f32, moisture: f32) -> Biome {
    if height < SEA_LEVEL {
        if height < 0.6 * SEA_LEVEL {
            return Biome::DeepWater;
        }
        return Biome::ShallowWater;
    }

    let tundra_radius =
        ((moisture - DESERT_MOISTURE).powi(2) + (height - ALPINE_LEVEL).powi(2)).sqrt();
    if tundra_radius < 30.0 {
        Biome::Tundra
    } else if height > ALPINE_LEVEL {
        Biome::Alpine
    } else if moisture + 80.0 < height {
        Biome::Jungle
    } else if moisture + height > 220.0 {
        Biome::Forest
    } else {
        Biome::Plain
    }
}
