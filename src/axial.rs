//! Аксиальные координаты гексагональной сетки.
//!
//! Доска адресуется двумя видами ключей:
//! - [`Axial`] `(q, r)` — тайл (шестиугольная ячейка);
//! - [`NodeKey`] `(q, r, corner)` — вершина сетки, общая для трёх тайлов.
//!
//! Каждый тайл владеет не более чем двумя вершинами: верхней (`corner = 0`)
//! и нижней (`corner = 1`); остальные четыре угла принадлежат соседям.

use serde::{Deserialize, Serialize};

/// Шесть соседей тайла в фиксированном порядке обхода.
pub const TILE_NEIGHBOR_OFFSETS: [(i32, i32); 6] =
    [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];

/// Аксиальная координата тайла.
///
/// Валидные координаты доски из `rings` колец удовлетворяют
/// `|q| ≤ rings`, `|r| ≤ rings`, `|q + r| ≤ rings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

impl Axial {
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Шесть соседних тайлов, часть которых может лежать за границей доски.
    #[must_use]
    pub fn neighbors(self) -> [Axial; 6] {
        TILE_NEIGHBOR_OFFSETS.map(|(dq, dr)| Axial::new(self.q + dq, self.r + dr))
    }

    /// Шесть вершин тайла в порядке обхода по часовой стрелке от верхней.
    #[must_use]
    pub fn corners(self) -> [NodeKey; 6] {
        let Axial { q, r } = self;
        [
            NodeKey::new(q, r, 0),
            NodeKey::new(q + 1, r - 1, 1),
            NodeKey::new(q, r + 1, 0),
            NodeKey::new(q, r, 1),
            NodeKey::new(q - 1, r + 1, 0),
            NodeKey::new(q, r - 1, 1),
        ]
    }

    /// Лежит ли координата внутри доски из `rings` колец.
    #[must_use]
    pub fn in_bounds(self, rings: i32) -> bool {
        self.q.abs() <= rings && self.r.abs() <= rings && (self.q + self.r).abs() <= rings
    }

    /// Точное число шагов между тайлами по сетке.
    ///
    /// # Примеры
    /// ```
    /// use hexboard::axial::Axial;
    /// assert_eq!(Axial::new(0, 0).hex_distance(Axial::new(2, -1)), 2);
    /// assert_eq!(Axial::new(1, 1).hex_distance(Axial::new(1, 1)), 0);
    /// ```
    #[must_use]
    pub fn hex_distance(self, other: Axial) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
    }

    /// Евклидово расстояние в пространстве кубических координат,
    /// эвристика поиска пути.
    #[must_use]
    pub fn euclidean(self, other: Axial) -> f64 {
        let dq = f64::from(self.q - other.q);
        let dr = f64::from(self.r - other.r);
        ((dq * dq + dr * dr + (dq + dr) * (dq + dr)) / 2.0).sqrt()
    }
}

/// Ключ вершины: аксиальная координата владеющего тайла плюс номер ряда.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub q: i32,
    pub r: i32,
    pub corner: u8,
}

impl NodeKey {
    #[must_use]
    pub const fn new(q: i32, r: i32, corner: u8) -> Self {
        Self { q, r, corner }
    }

    /// Тайл, владеющий вершиной.
    #[must_use]
    pub const fn owner(self) -> Axial {
        Axial::new(self.q, self.r)
    }

    /// Три соседние вершины. Верхние вершины соседствуют только с нижними
    /// и наоборот; часть соседей может не существовать на границе доски.
    #[must_use]
    pub fn neighbors(self) -> [NodeKey; 3] {
        let NodeKey { q, r, .. } = self;
        if self.corner == 0 {
            [
                NodeKey::new(q + 1, r - 1, 1),
                NodeKey::new(q, r - 1, 1),
                NodeKey::new(q + 1, r - 2, 1),
            ]
        } else {
            [
                NodeKey::new(q, r + 1, 0),
                NodeKey::new(q - 1, r + 2, 0),
                NodeKey::new(q - 1, r + 1, 0),
            ]
        }
    }

    /// Эвристика поиска пути между вершинами: евклидово расстояние
    /// владеющих тайлов, ряд вершины не учитывается.
    #[must_use]
    pub fn euclidean(self, other: NodeKey) -> f64 {
        self.owner().euclidean(other.owner())
    }
}

/// Все валидные координаты доски из `rings` колец в порядке построения:
/// столбцы `q` слева направо, внутри столбца `r` по возрастанию.
pub fn axial_range(rings: i32) -> impl Iterator<Item = Axial> {
    (-rings..=rings).flat_map(move |q| {
        let lo = (-rings).max(-q - rings);
        let hi = rings.min(rings - q);
        (lo..=hi).map(move |r| Axial::new(q, r))
    })
}
