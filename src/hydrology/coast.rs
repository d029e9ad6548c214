//! Рост прибрежных меток и резка каналов.

use super::{Hydrology, sea};
use crate::board::{COAST_PERM, SEA_LEVEL};
use crate::grid::{HexGrid, TileId};
use std::collections::VecDeque;

/// BFS от тайлов с меткой 1, оставленных заливкой океана. Каждый
/// непомеченный сухопутный сосед получает метку родителя плюс один; рост за
/// `COAST_PERM` от сухопутного родителя вместо метки затапливает соседа и
/// прорезает канал назад к открытой воде, так что глубоких внутренних
/// областей без выхода к морю на доске не остаётся. Затопленная тем временем
/// часть очереди продолжает обходиться как вода и каналов больше не режет.
pub(crate) fn make_coast(grid: &mut HexGrid, hydro: &mut Hydrology) {
    let mut queue: VecDeque<TileId> = (0..grid.tiles.len() as u32)
        .map(TileId)
        .filter(|id| hydro.coast[id.0 as usize].is_some())
        .collect();

    while let Some(t) = queue.pop_front() {
        let Some(dist) = hydro.coast[t.0 as usize] else {
            continue;
        };
        for child in grid.tile_neighbor_ids(t) {
            let idx = child.0 as usize;
            if hydro.ocean_tiles[idx] || hydro.coast[idx].is_some() {
                continue;
            }
            if dist + 1 > COAST_PERM && grid.tile(t).height >= SEA_LEVEL {
                // Сосед уходит в океан без метки: высота опускается, как у
                // прорезанных тайлов, вершины помечаются океанскими.
                grid.tile_mut(child).height = 0.9 * SEA_LEVEL;
                hydro.ocean_tiles[idx] = true;
                for node in grid.adjacent_node_ids(child) {
                    hydro.ocean_nodes[node.0 as usize] = true;
                }
                sea::fill_sea(grid, hydro, child);
                carve_channel(grid, hydro, t);
            } else {
                hydro.coast[idx] = Some(dist + 1);
                queue.push_back(child);
            }
        }
    }
}

/// Прорезает канал от тайла `start` по строго убывающим прибрежным меткам.
/// Каждый пройденный тайл опускается до `0.9 × SEA_LEVEL` и уходит в океан;
/// его вершины ниже уровня моря поднимаются до той же отметки и помечаются
/// океанскими. Тайл без соседа с меткой на единицу меньше заканчивает канал
/// и остаётся сушей. Метки прорезанных тайлов не стираются.
fn carve_channel(grid: &mut HexGrid, hydro: &mut Hydrology, start: TileId) {
    let mut current = start;
    loop {
        let Some(dist) = hydro.coast[current.0 as usize] else {
            return;
        };
        let next = grid
            .tile_neighbor_ids(current)
            .into_iter()
            .find(|n| hydro.coast[n.0 as usize] == Some(dist - 1));
        let Some(next) = next else {
            return;
        };

        for node in grid.adjacent_node_ids(current) {
            if grid.node(node).elevation < SEA_LEVEL {
                grid.node_mut(node).elevation = 0.9 * SEA_LEVEL;
            }
            hydro.ocean_nodes[node.0 as usize] = true;
        }
        grid.tile_mut(current).height = 0.9 * SEA_LEVEL;
        hydro.ocean_tiles[current.0 as usize] = true;

        current = next;
    }
}
