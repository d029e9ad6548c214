//! Поиск пути лучшим-первым по графам тайлов и вершин.
//!
//! Фронтир упорядочен составным ключом из стоимости и порядкового номера
//! вставки: стоимость складывается из длины пути в рёбрах и евклидовой
//! эвристики до цели, номер вставки делает порядок строго тотальным, так
//! что результат не зависит от капризов кучи. Уже посещённая вершина
//! принимается повторно, только когда новая стоимость строго меньше ключа
//! снятой записи.

use crate::grid::{HexGrid, NodeId, Tile, TileId};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::hash::Hash;

/// Проходимость тайлового поиска.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Любой тайл проходим.
    Basic,
    /// Только тайлы под уровнем моря.
    Water,
}

impl Traversal {
    /// Проходим ли тайл при данном виде перемещения.
    #[must_use]
    pub fn admits(self, tile: &Tile) -> bool {
        match self {
            Traversal::Basic => true,
            Traversal::Water => tile.is_water(),
        }
    }
}

/// Путь по тайлам от `start` к `goal` включительно, `None` при
/// исчерпании фронтира.
#[must_use]
pub fn tile_path(
    grid: &HexGrid,
    start: TileId,
    goal: TileId,
    kind: Traversal,
) -> Option<Vec<TileId>> {
    best_first(
        start,
        goal,
        |id| {
            grid.tile_neighbor_ids(id)
                .into_iter()
                .filter(|&n| kind.admits(grid.tile(n)))
                .collect()
        },
        |a, b| grid.tile(a).axial.euclidean(grid.tile(b).axial),
    )
}

/// Путь по вершинам; проходимы все соседние вершины.
#[must_use]
pub fn node_path(grid: &HexGrid, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    best_first(
        start,
        goal,
        |id| grid.node_neighbor_ids(id),
        |a, b| grid.node(a).key.euclidean(grid.node(b).key),
    )
}

/// Общий каркас: пути хранятся в арене, куча несёт только ключи и номера.
fn best_first<N, FN, FH>(start: N, goal: N, mut neighbors: FN, heuristic: FH) -> Option<Vec<N>>
where
    N: Copy + Eq + Hash,
    FN: FnMut(N) -> Vec<N>,
    FH: Fn(N, N) -> f64,
{
    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
    let mut paths: Vec<Vec<N>> = vec![vec![start]];
    let mut visited: HashSet<N> = HashSet::from([start]);
    frontier.push(Reverse((OrderedFloat(heuristic(start, goal)), 0)));

    while let Some(Reverse((key, seq))) = frontier.pop() {
        let path = std::mem::take(&mut paths[seq]);
        let Some(&last) = path.last() else {
            continue;
        };
        if last == goal {
            return Some(path);
        }
        for n in neighbors(last) {
            let cost = path.len() as f64 + heuristic(n, goal);
            if !visited.contains(&n) || cost < key.into_inner() {
                visited.insert(n);
                let mut extended = path.clone();
                extended.push(n);
                if n == goal {
                    return Some(extended);
                }
                frontier.push(Reverse((OrderedFloat(cost), paths.len())));
                paths.push(extended);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axial::{Axial, NodeKey};
    use crate::noisefield::{Field, NoiseField};

    fn uniform_field(width: u32, height: u32, elevation: f32) -> NoiseField {
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

    /// Кольцо воды вокруг единственного сухого центра.
    fn island_grid() -> HexGrid {
        let mut field = uniform_field(64, 64, 100.0);
        field.elevation.set(32, 32, 180.0);
        HexGrid::build(&field, 1, 64, 64)
    }

    fn tile(grid: &HexGrid, q: i32, r: i32) -> TileId {
        grid.tile_id_at(Axial::new(q, r)).unwrap()
    }

    #[test]
    fn straight_line_across_open_water() {
        let field = uniform_field(64, 64, 100.0);
        let grid = HexGrid::build(&field, 2, 64, 64);
        let path = tile_path(
            &grid,
            tile(&grid, -2, 0),
            tile(&grid, 2, 0),
            Traversal::Basic,
        )
        .unwrap();

        let axials: Vec<_> = path.iter().map(|&id| grid.tile(id).axial).collect();
        assert_eq!(
            axials,
            vec![
                Axial::new(-2, 0),
                Axial::new(-1, 0),
                Axial::new(0, 0),
                Axial::new(1, 0),
                Axial::new(2, 0),
            ]
        );
    }

    #[test]
    fn water_route_bends_around_land() {
        let grid = island_grid();
        let start = tile(&grid, -1, 0);
        let goal = tile(&grid, 1, 0);

        // По суше напрямик через центр.
        let basic = tile_path(&grid, start, goal, Traversal::Basic).unwrap();
        assert_eq!(basic.len(), 3);

        // По воде центр непроходим: обход по кольцу на один шаг длиннее.
        let water = tile_path(&grid, start, goal, Traversal::Water).unwrap();
        let axials: Vec<_> = water.iter().map(|&id| grid.tile(id).axial).collect();
        assert_eq!(
            axials,
            vec![
                Axial::new(-1, 0),
                Axial::new(-1, 1),
                Axial::new(0, 1),
                Axial::new(1, 0),
            ]
        );
        assert!(!water.contains(&tile(&grid, 0, 0)));

        // Повторный запуск даёт в точности тот же маршрут.
        assert_eq!(tile_path(&grid, start, goal, Traversal::Water), Some(water));
    }

    #[test]
    fn landlocked_goal_exhausts_the_frontier() {
        let grid = island_grid();
        let water = tile_path(
            &grid,
            tile(&grid, -1, 0),
            tile(&grid, 0, 0),
            Traversal::Water,
        );
        assert_eq!(water, None);
    }

    #[test]
    fn trivial_path_is_the_start_itself() {
        let grid = island_grid();
        let start = tile(&grid, 0, 1);
        let path = tile_path(&grid, start, start, Traversal::Water).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn node_route_is_deterministic_between_tied_sides() {
        // Вокруг центра два равноценных маршрута по три ребра; побеждает
        // вставленный раньше, через (1,-1,1).
        let grid = island_grid();
        let start = grid.node_id_at(NodeKey::new(0, 0, 0)).unwrap();
        let goal = grid.node_id_at(NodeKey::new(0, 0, 1)).unwrap();

        let path = node_path(&grid, start, goal).unwrap();
        let keys: Vec<_> = path.iter().map(|&id| grid.node(id).key).collect();
        assert_eq!(
            keys,
            vec![
                NodeKey::new(0, 0, 0),
                NodeKey::new(1, -1, 1),
                NodeKey::new(0, 1, 0),
                NodeKey::new(0, 0, 1),
            ]
        );
    }
}
