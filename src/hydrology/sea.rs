//! Заливка океана от затравочного тайла.

use super::Hydrology;
use crate::grid::{HexGrid, TileId};
use std::collections::VecDeque;

/// Итеративная заливка: каждый достижимый тайл под уровнем моря попадает в
/// океан, его вершины регистрируются океанскими, а сухопутные соседи океана
/// получают прибрежную метку 1. Сама затравка в океан не записывается; если
/// она под водой, обратный шаг от любого её соседа вернёт её в компоненту.
pub(crate) fn fill_sea(grid: &HexGrid, hydro: &mut Hydrology, seed: TileId) {
    let mut queue = VecDeque::from([seed]);
    while let Some(t) = queue.pop_front() {
        for n in grid.tile_neighbor_ids(t) {
            let idx = n.0 as usize;
            if !hydro.ocean_tiles[idx] && grid.tile(n).is_water() {
                hydro.ocean_tiles[idx] = true;
                for node in grid.adjacent_node_ids(n) {
                    hydro.ocean_nodes[node.0 as usize] = true;
                }
                queue.push_back(n);
            } else if !grid.tile(n).is_water() && hydro.coast[idx].is_none() {
                hydro.coast[idx] = Some(1);
            }
        }
    }
}
