//! Двойная топология доски: арены тайлов и вершин.
//!
//! Тайлы строятся для всех аксиальных координат внутри кольцевой границы.
//! Вершины дедуплицируются правилом владения: тайл создаёт свой верхний
//! (нижний) угол только когда существуют оба соседних тайла, делящих эту
//! вершину, поэтому в аренах оказываются ровно внутренние вершины сетки и
//! каждая — один раз. Сущности адресуются плотными идентификаторами арен;
//! поиск по координате идёт через хеш-индексы.

use crate::axial::{Axial, NodeKey, axial_range};
use crate::board::{SEA_LEVEL, SHALLOW_BUFFER};
use crate::noisefield::NoiseField;
use std::collections::HashMap;

/// Идентификатор тайла в арене, стабилен на всё время жизни доски.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Идентификатор вершины в арене.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Шестиугольная ячейка доски.
#[derive(Debug, Clone)]
pub struct Tile {
    pub axial: Axial,
    /// Точка выборки в шумовом поле, неизменна после создания.
    pub pixel: (u32, u32),
    /// Высота на шкале `[0, 256]`; прибрежная резка может её менять.
    pub height: f32,
    pub moisture: f32,
}

impl Tile {
    /// Тайл под уровнем моря.
    #[must_use]
    pub fn is_water(&self) -> bool {
        self.height < SEA_LEVEL
    }
}

/// Вершина сетки, общая для трёх тайлов.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: NodeKey,
    pub pixel: (u32, u32),
    pub elevation: f32,
    /// Тайл, создавший вершину; источник влажности для рек.
    pub owner: TileId,
    /// Накопленный объём стока, ненулевой только в фазе синтеза рек.
    pub volume: f32,
    /// Единственное ребро наискорейшего спуска.
    pub out_edge: Option<NodeId>,
    /// Обратные ссылки: все вершины, чьё `out_edge` указывает сюда.
    pub in_edges: Vec<NodeId>,
}

/// Арены тайлов и вершин с координатными индексами.
#[derive(Debug)]
pub struct HexGrid {
    pub rings: i32,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
    pub nodes: Vec<Node>,
    tile_index: HashMap<Axial, TileId>,
    node_index: HashMap<NodeKey, NodeId>,
    /// Тайлы внешних колец выше уровня моря, принудительно опускаемые в море.
    pub ring_buffer: Vec<TileId>,
}

impl HexGrid {
    /// Строит сетку, выбирая высоту и влажность из шумового поля, и
    /// опускает пограничную полосу под уровень моря.
    #[must_use]
    pub fn build(field: &NoiseField, rings: i32, width: u32, height: u32) -> HexGrid {
        let mut grid = HexGrid {
            rings,
            width,
            height,
            tiles: Vec::new(),
            nodes: Vec::new(),
            tile_index: HashMap::new(),
            node_index: HashMap::new(),
            ring_buffer: Vec::new(),
        };

        let center = Axial::new(0, 0);
        for axial in axial_range(rings) {
            let Axial { q, r } = axial;
            let px = grid.x_translate(f64::from(q), f64::from(r));
            let py = grid.y_translate(f64::from(r));
            let elevation = field.elevation.get(px, py);
            let moisture = field.moisture_for(px, py, elevation);

            let tile_id = TileId(grid.tiles.len() as u32);
            grid.tiles.push(Tile {
                axial,
                pixel: (px, py),
                height: elevation,
                moisture,
            });
            grid.tile_index.insert(axial, tile_id);

            // Пограничная полоса: суша во внешних кольцах. Центр — нулевое
            // кольцо и в полосу не входит даже на крошечных досках.
            let dist = axial.hex_distance(center);
            if elevation > SEA_LEVEL && dist > 0 && dist > rings - SHALLOW_BUFFER {
                grid.ring_buffer.push(tile_id);
            }

            // Верхняя вершина существует, когда существуют оба тайла над ней.
            if r != -q - rings && r != -rings && q != rings {
                let ny = grid.y_translate(f64::from(r) - 2.0 / 3.0);
                grid.push_node(NodeKey::new(q, r, 0), (px, ny), field.elevation.get(px, ny), tile_id);
            }
            // Нижняя вершина — когда существуют оба тайла под ней.
            if r != rings && q != -rings && r != rings - q {
                let ny = grid.y_translate(f64::from(r) + 2.0 / 3.0);
                grid.push_node(NodeKey::new(q, r, 1), (px, ny), field.elevation.get(px, ny), tile_id);
            }
        }

        grid.set_ring();
        grid
    }

    fn push_node(&mut self, key: NodeKey, pixel: (u32, u32), elevation: f32, owner: TileId) {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            key,
            pixel,
            elevation,
            owner,
            volume: 0.0,
            out_edge: None,
            in_edges: Vec::with_capacity(3),
        });
        self.node_index.insert(key, id);
    }

    /// Опускает пограничную полосу и её вершины до `0.9 × SEA_LEVEL`:
    /// остров всегда окружён судоходным морем.
    fn set_ring(&mut self) {
        for i in 0..self.ring_buffer.len() {
            let tile_id = self.ring_buffer[i];
            self.tiles[tile_id.0 as usize].height = 0.9 * SEA_LEVEL;
            for node_id in self.adjacent_node_ids(tile_id) {
                self.nodes[node_id.0 as usize].elevation = 0.9 * SEA_LEVEL;
            }
        }
    }

    /// Проекция аксиальной координаты на ось X поля.
    fn x_translate(&self, q: f64, r: f64) -> u32 {
        let sqrt3 = 3.0_f64.sqrt();
        let w = f64::from(self.width);
        let span = 2.0 * sqrt3 * f64::from(self.rings) + 1.0;
        (w * (0.5 + (sqrt3 * q + sqrt3 / 2.0 * r) / span)) as u32
    }

    /// Проекция ряда `r` на ось Y поля; ряды вершин лежат на `r ∓ 2/3`.
    fn y_translate(&self, r: f64) -> u32 {
        let sqrt3 = 3.0_f64.sqrt();
        let h = f64::from(self.height);
        let span = 3.0 * f64::from(self.rings) + 1.0;
        (h * (0.5 + (1.5 * r) / span * sqrt3 / 2.0)) as u32
    }

    #[must_use]
    pub fn tile_id_at(&self, axial: Axial) -> Option<TileId> {
        self.tile_index.get(&axial).copied()
    }

    #[must_use]
    pub fn node_id_at(&self, key: NodeKey) -> Option<NodeId> {
        self.node_index.get(&key).copied()
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.0 as usize]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id.0 as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// До шести соседних тайлов; отсутствующие за границей опускаются.
    #[must_use]
    pub fn tile_neighbor_ids(&self, id: TileId) -> Vec<TileId> {
        self.tile(id)
            .axial
            .neighbors()
            .iter()
            .filter_map(|a| self.tile_id_at(*a))
            .collect()
    }

    /// До трёх соседних вершин.
    #[must_use]
    pub fn node_neighbor_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .key
            .neighbors()
            .iter()
            .filter_map(|k| self.node_id_at(*k))
            .collect()
    }

    /// Существующие вершины тайла, от нуля до шести.
    #[must_use]
    pub fn adjacent_node_ids(&self, id: TileId) -> Vec<NodeId> {
        self.tile(id)
            .axial
            .corners()
            .iter()
            .filter_map(|k| self.node_id_at(*k))
            .collect()
    }
}
