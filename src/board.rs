// src/board.rs
//! Собранная доска: шумовое поле, гекс-сетка и гидрология под одной крышей.
//!
//! `Board::new` прогоняет весь конвейер — генерацию шума, укладку сетки,
//! заливку океана, разметку побережья и сборку рек — и отдаёт неизменяемую
//! доску с координатным доступом к тайлам, вершинам и маршрутам.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::axial::{Axial, NodeKey};
use crate::biome::{self, Biome};
use crate::config::BoardParams;
use crate::error::{GenError, Result};
use crate::grid::{HexGrid, Node, NodeId, Tile, TileId};
use crate::hydrology::{self, Hydrology, River};
use crate::noisefield::NoiseField;
use crate::pathfinder::{self, Traversal};

/// Доля объёма, переживающая испарение на каждом шаге потока.
pub const EVAP: f32 = 0.9;

/// Уровень моря: тайлы и вершины ниже считаются водой.
pub const SEA_LEVEL: f32 = 132.0;

/// Высота, с которой начинается высокогорье.
pub const ALPINE_LEVEL: f32 = 200.0;

/// Влажность, ниже которой климат считается засушливым.
pub const DESERT_MOISTURE: f32 = 64.0;

/// Объём, с которого участок потока заслуживает имени реки.
pub const RIVER_THRESHOLD: f32 = 600.0;

/// Ширина пограничной полосы колец, опускаемой под море.
pub const SHALLOW_BUFFER: i32 = 3;

/// Минимальное число вершин реки; устье в океане снижает порог до двух.
pub const RIVER_LIMIT: usize = 3;

/// Прибрежная метка, за которой к открытой воде пробивается канал.
pub const COAST_PERM: u32 = 4;

/// Готовая доска. Поля и сетка после сборки не меняются, вся гидрология
/// предвычислена.
pub struct Board {
    seed: u64,
    field: NoiseField,
    grid: HexGrid,
    hydro: Hydrology,
}

impl Board {
    /// Генерирует доску по параметрам. Зерно, если оно не задано,
    /// разыгрывается и сохраняется в доске для воспроизведения.
    pub fn new(params: &BoardParams) -> Result<Board> {
        if params.rings < 1 {
            return Err(GenError::Precondition {
                reason: format!("rings must be at least 1, got {}", params.rings),
            });
        }
        let seed = params.seed.unwrap_or_else(rand::random);
        let field = NoiseField::generate(seed, params.width, params.height)?;
        Ok(Board::from_field(seed, field, params.rings))
    }

    /// Собирает доску из готового поля: точка входа для рукотворного рельефа.
    pub(crate) fn from_field(seed: u64, field: NoiseField, rings: i32) -> Board {
        let mut grid = HexGrid::build(&field, rings, field.elevation.width, field.elevation.height);
        println!("  Сетка: {} тайлов, {} вершин", grid.tiles.len(), grid.nodes.len());
        let hydro = hydrology::generate(&mut grid);
        Board {
            seed,
            field,
            grid,
            hydro,
        }
    }

    /// Зерно, которым построена доска.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Радиус доски в кольцах.
    #[must_use]
    pub fn rings(&self) -> i32 {
        self.grid.rings
    }

    /// Все тайлы в порядке арены.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.grid.tiles
    }

    /// Все вершины в порядке арены.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.grid.nodes
    }

    /// Истоки стока: вершины без более высоких соседей.
    #[must_use]
    pub fn peaks(&self) -> &[NodeId] {
        &self.hydro.peaks
    }

    /// Зарегистрированные реки в порядке возрастания устья.
    #[must_use]
    pub fn rivers(&self) -> &[River] {
        &self.hydro.rivers
    }

    /// Тайл по идентификатору арены.
    #[must_use]
    pub fn tile(&self, id: TileId) -> &Tile {
        self.grid.tile(id)
    }

    /// Вершина по идентификатору арены.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        self.grid.node(id)
    }

    /// Тайл по аксиальной координате, `None` за пределами доски.
    #[must_use]
    pub fn tile_at(&self, axial: Axial) -> Option<&Tile> {
        self.grid.tile_id_at(axial).map(|id| self.grid.tile(id))
    }

    /// Вершина по ключу, `None` для несуществующих углов.
    #[must_use]
    pub fn node_at(&self, key: NodeKey) -> Option<&Node> {
        self.grid.node_id_at(key).map(|id| self.grid.node(id))
    }

    /// Существующие соседи тайла в фиксированном порядке обхода.
    #[must_use]
    pub fn tile_neighbors(&self, tile: &Tile) -> Vec<&Tile> {
        tile.axial
            .neighbors()
            .iter()
            .filter_map(|&a| self.tile_at(a))
            .collect()
    }

    /// Существующие соседи вершины в фиксированном порядке обхода.
    #[must_use]
    pub fn node_neighbors(&self, node: &Node) -> Vec<&Node> {
        node.key
            .neighbors()
            .iter()
            .filter_map(|&k| self.node_at(k))
            .collect()
    }

    /// Высота итогового поля в пикселе, `None` за его пределами.
    #[must_use]
    pub fn elevation_at(&self, x: u32, y: u32) -> Option<f32> {
        self.field.elevation.sample(x, y)
    }

    /// Принадлежит ли тайл залитому океану.
    #[must_use]
    pub fn is_ocean(&self, axial: Axial) -> bool {
        self.grid
            .tile_id_at(axial)
            .is_some_and(|id| self.hydro.is_ocean_tile(id))
    }

    /// Прибрежная метка тайла: 1 у кромки воды, дальше вглубь острова.
    #[must_use]
    pub fn coast_distance(&self, axial: Axial) -> Option<u32> {
        self.hydro.coast_distance(self.grid.tile_id_at(axial)?)
    }

    /// Биом тайла по его высоте и влажности.
    #[must_use]
    pub fn classify_biome(&self, tile: &Tile) -> Biome {
        biome::classify(tile.height, tile.moisture)
    }

    /// Маршрут между тайлами; `kind` задаёт проходимость. Возвращает
    /// последовательность координат от старта до цели включительно.
    #[must_use]
    pub fn path(&self, from: Axial, to: Axial, kind: Traversal) -> Option<Vec<Axial>> {
        let start = self.grid.tile_id_at(from)?;
        let goal = self.grid.tile_id_at(to)?;
        let ids = pathfinder::tile_path(&self.grid, start, goal, kind)?;
        Some(ids.into_iter().map(|id| self.grid.tile(id).axial).collect())
    }

    /// Маршрут по вершинам дуальной сетки.
    #[must_use]
    pub fn node_path(&self, from: NodeKey, to: NodeKey) -> Option<Vec<NodeKey>> {
        let start = self.grid.node_id_at(from)?;
        let goal = self.grid.node_id_at(to)?;
        let ids = pathfinder::node_path(&self.grid, start, goal)?;
        Some(ids.into_iter().map(|id| self.grid.node(id).key).collect())
    }

    /// Сводка по доске для сериализации.
    #[must_use]
    pub fn report(&self) -> BoardReport {
        let mut biomes: BTreeMap<String, usize> = BTreeMap::new();
        for tile in &self.grid.tiles {
            *biomes
                .entry(self.classify_biome(tile).name().to_string())
                .or_insert(0) += 1;
        }
        let rivers = self
            .hydro
            .rivers
            .iter()
            .filter_map(|river| {
                let mouth = self.grid.node(river.mouth()?).key;
                Some(RiverReport {
                    mouth,
                    length: river.nodes.len(),
                    head_volume: river.head_volume,
                    reaches_ocean: river.reaches_ocean,
                })
            })
            .collect();
        BoardReport {
            seed: self.seed,
            rings: self.grid.rings,
            width: self.grid.width,
            height: self.grid.height,
            tiles: self.grid.tiles.len(),
            nodes: self.grid.nodes.len(),
            ocean_tiles: self.hydro.ocean_tiles.iter().filter(|&&o| o).count(),
            coast_tiles: self.hydro.coast.iter().filter(|c| c.is_some()).count(),
            peaks: self.hydro.peaks.len(),
            biomes,
            rivers,
        }
    }
}

/// Сводка по готовой доске: размеры, перепись биомов и реки.
#[derive(Debug, Serialize)]
pub struct BoardReport {
    pub seed: u64,
    pub rings: i32,
    pub width: u32,
    pub height: u32,
    pub tiles: usize,
    pub nodes: usize,
    pub ocean_tiles: usize,
    pub coast_tiles: usize,
    pub peaks: usize,
    pub biomes: BTreeMap<String, usize>,
    pub rivers: Vec<RiverReport>,
}

/// Строка отчёта об одной реке.
#[derive(Debug, Serialize)]
pub struct RiverReport {
    pub mouth: NodeKey,
    pub length: usize,
    pub head_volume: f32,
    pub reaches_ocean: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noisefield::Field;

    /// Плоское поле с постоянной высотой и влажностью 128.
    fn flat_field(width: u32, height: u32, elevation: f32) -> NoiseField {
        let size = (width as usize) * (height as usize);
        NoiseField {
            elevation: Field {
                width,
                height,
                data: vec![elevation; size],
            },
            moisture: Field {
                width,
                height,
                data: vec![128.0; size],
            },
        }
    }

    /// Конус: высота линейно падает от `top` на `slope` за пиксель удаления
    /// от `apex`.
    fn cone_field(width: u32, height: u32, apex: (u32, u32), top: f32, slope: f32) -> NoiseField {
        let mut field = flat_field(width, height, 0.0);
        for y in 0..height {
            for x in 0..width {
                let dx = f64::from(x) - f64::from(apex.0);
                let dy = f64::from(y) - f64::from(apex.1);
                let d = (dx * dx + dy * dy).sqrt();
                field
                    .elevation
                    .set(x, y, (f64::from(top) - f64::from(slope) * d) as f32);
            }
        }
        field
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let no_rings = BoardParams {
            rings: 0,
            ..BoardParams::default()
        };
        assert!(matches!(
            Board::new(&no_rings),
            Err(GenError::Precondition { .. })
        ));

        let no_width = BoardParams {
            seed: Some(1),
            width: 0,
            ..BoardParams::default()
        };
        assert!(Board::new(&no_width).is_err());
    }

    #[test]
    fn lone_island_keeps_trivial_hydrology() {
        let mut field = flat_field(64, 64, 100.0);
        field.elevation.set(32, 32, 180.0);
        let board = Board::from_field(7, field, 1);

        assert_eq!(board.seed(), 7);
        assert_eq!(board.rings(), 1);

        // Океан — все шесть тайлов кольца, суша только в центре.
        let report = board.report();
        assert_eq!(report.ocean_tiles, 6);
        assert!(board.is_ocean(Axial::new(1, 0)));
        assert!(!board.is_ocean(Axial::new(0, 0)));

        // Единственное побережье — сам остров.
        assert_eq!(board.coast_distance(Axial::new(0, 0)), Some(1));
        assert_eq!(board.coast_distance(Axial::new(1, 0)), None);
        assert_eq!(report.coast_tiles, 1);

        // Все вершины океанские: ни пиков, ни рек.
        assert!(board.peaks().is_empty());
        assert!(board.rivers().is_empty());
        assert!(report.rivers.is_empty());

        // Шесть мелководных тайлов и один лесной остров.
        assert_eq!(report.biomes.get("ShallowWater"), Some(&6));
        assert_eq!(report.biomes.get("Forest"), Some(&1));
    }

    #[test]
    fn cone_island_drains_from_its_single_summit() {
        // Положение верхней вершины центрального тайла снимается с плоской
        // сетки, чтобы конус опирался точно на её пиксель.
        let probe = HexGrid::build(&flat_field(1024, 1024, 100.0), 6, 1024, 1024);
        let apex_key = NodeKey::new(0, 0, 0);
        let apex_px = probe.node(probe.node_id_at(apex_key).unwrap()).pixel;

        let field = cone_field(1024, 1024, apex_px, 230.0, 0.45);
        let board = Board::from_field(42, field, 6);

        // Единственный пик — вершина конуса.
        let apex = board.grid.node_id_at(apex_key).unwrap();
        assert_eq!(board.peaks(), &[apex]);

        // Сток строго вниз, обратные рёбра согласованы.
        for (i, node) in board.nodes().iter().enumerate() {
            let id = NodeId(i as u32);
            if let Some(out) = node.out_edge {
                assert!(board.node(out).elevation < node.elevation);
                assert!(board.node(out).in_edges.contains(&id));
            }
        }

        // Цепочка от пика конечна и заканчивается в океане.
        let mut current = apex;
        let mut steps = 0;
        while let Some(next) = board.node(current).out_edge {
            current = next;
            steps += 1;
            assert!(steps <= board.nodes().len(), "сток зациклился");
        }
        assert!(board.hydro.is_ocean_node(current));

        // Океанские тайлы лежат под уровнем моря и классифицируются водой.
        for (i, tile) in board.tiles().iter().enumerate() {
            if board.hydro.is_ocean_tile(TileId(i as u32)) {
                assert!(tile.is_water());
                assert!(matches!(
                    board.classify_biome(tile),
                    Biome::DeepWater | Biome::ShallowWater
                ));
            }
        }

        // Центр конуса — высокогорье.
        let center = board.tile_at(Axial::new(0, 0)).unwrap();
        assert!(center.height > ALPINE_LEVEL);
        assert_eq!(board.classify_biome(center), Biome::Alpine);

        // Реки стекают с конуса: каждая начинается с порогового объёма
        // и впадает в океан.
        assert!(!board.rivers().is_empty());
        for river in board.rivers() {
            assert!(river.head_volume >= RIVER_THRESHOLD);
            assert!(river.reaches_ocean);
            assert!(river.nodes.len() > 1);
            let mouth = river.mouth().unwrap();
            assert!(board.hydro.is_ocean_node(mouth));
        }
    }

    #[test]
    fn generated_board_keeps_navigable_rim() {
        let params = BoardParams {
            seed: Some(42),
            rings: 12,
            width: 512,
            height: 512,
        };
        let board = Board::new(&params).unwrap();
        assert_eq!(board.seed(), 42);

        let report = board.report();
        assert_eq!(report.tiles, 469);
        assert_eq!(report.nodes, 864);
        assert_eq!(report.tiles, board.tiles().len());
        assert_eq!(report.biomes.values().sum::<usize>(), report.tiles);
        assert_eq!(report.rivers.len(), board.rivers().len());

        // Пограничная полоса гарантирует судоходное кольцо вокруг острова.
        let west = Axial::new(-12, 0);
        let east = Axial::new(12, 0);
        let channel = board.path(west, east, Traversal::Water).unwrap();
        assert_eq!(channel.first(), Some(&west));
        assert_eq!(channel.last(), Some(&east));
        assert!(
            channel
                .iter()
                .all(|&a| board.tile_at(a).is_some_and(|t| t.is_water()))
        );

        // Координатный доступ согласован с ареной.
        for tile in board.tiles() {
            assert_eq!(board.tile_at(tile.axial).map(|t| t.axial), Some(tile.axial));
        }
        assert!(board.tile_at(Axial::new(13, 0)).is_none());
        assert!(board.node_at(NodeKey::new(12, 0, 1)).is_none());
        assert!(board.path(west, Axial::new(13, 0), Traversal::Water).is_none());

        // Центр окружён шестью соседями, угловой тайл кольца — тремя.
        let center = board.tile_at(Axial::new(0, 0)).unwrap();
        assert_eq!(board.tile_neighbors(center).len(), 6);
        let rim = board.tile_at(west).unwrap();
        assert_eq!(board.tile_neighbors(rim).len(), 3);
        let node = board.node_at(NodeKey::new(0, 0, 0)).unwrap();
        assert_eq!(board.node_neighbors(node).len(), 3);

        // Поле доступно по пикселям в исходных границах.
        assert!(board.elevation_at(0, 0).is_some());
        assert!(board.elevation_at(511, 511).is_some());
        assert!(board.elevation_at(512, 0).is_none());

        // Маршрут по вершинам существует и держит концы на месте.
        let route = board
            .node_path(NodeKey::new(0, 0, 0), NodeKey::new(0, 0, 1))
            .unwrap();
        assert_eq!(route.first(), Some(&NodeKey::new(0, 0, 0)));
        assert_eq!(route.last(), Some(&NodeKey::new(0, 0, 1)));
    }

    #[test]
    fn fixed_seed_reproduces_identical_boards() {
        let params = BoardParams {
            seed: Some(99),
            rings: 8,
            width: 256,
            height: 256,
        };
        let a = Board::new(&params).unwrap();
        let b = Board::new(&params).unwrap();

        assert_eq!(a.tiles().len(), b.tiles().len());
        for (ta, tb) in a.tiles().iter().zip(b.tiles()) {
            assert_eq!(ta.axial, tb.axial);
            assert_eq!(ta.pixel, tb.pixel);
            assert_eq!(ta.height.to_bits(), tb.height.to_bits());
            assert_eq!(ta.moisture.to_bits(), tb.moisture.to_bits());
        }
        for (na, nb) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(na.key, nb.key);
            assert_eq!(na.elevation.to_bits(), nb.elevation.to_bits());
            assert_eq!(na.volume.to_bits(), nb.volume.to_bits());
            assert_eq!(na.out_edge, nb.out_edge);
            assert_eq!(na.in_edges, nb.in_edges);
        }
        assert_eq!(a.hydro.ocean_tiles, b.hydro.ocean_tiles);
        assert_eq!(a.hydro.coast, b.hydro.coast);
        assert_eq!(a.peaks(), b.peaks());
        assert_eq!(a.rivers().len(), b.rivers().len());
        for (ra, rb) in a.rivers().iter().zip(b.rivers()) {
            assert_eq!(ra.nodes, rb.nodes);
            assert_eq!(ra.head_volume.to_bits(), rb.head_volume.to_bits());
            assert_eq!(ra.reaches_ocean, rb.reaches_ocean);
        }
    }

    #[test]
    fn drawn_seed_can_rebuild_the_same_board() {
        let params = BoardParams {
            seed: None,
            rings: 4,
            width: 128,
            height: 128,
        };
        let first = Board::new(&params).unwrap();
        let replay = BoardParams {
            seed: Some(first.seed()),
            ..params
        };
        let second = Board::new(&replay).unwrap();

        assert_eq!(first.hydro.ocean_tiles, second.hydro.ocean_tiles);
        for (ta, tb) in first.tiles().iter().zip(second.tiles()) {
            assert_eq!(ta.height.to_bits(), tb.height.to_bits());
        }
    }
}
