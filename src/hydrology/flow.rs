//! Пики и лес наискорейшего спуска.

use super::Hydrology;
use crate::grid::{HexGrid, NodeId};

/// Обходит вершины по арене. Неокеанская вершина без строго более высокого
/// соседа становится пиком; среди строго более низких соседей выбирается
/// самый низкий как единственное выходное ребро, при равной высоте
/// побеждает более ранний сосед в порядке фиксированных смещений. Сравнение
/// высот учитывает и океанских соседей, но сами океанские вершины рёбер не
/// растят и пиками не бывают; входящие рёбра они принимают, становясь
/// устьями стока.
pub(crate) fn find_peaks(grid: &mut HexGrid, hydro: &mut Hydrology) {
    for i in 0..grid.nodes.len() {
        let id = NodeId(i as u32);
        if hydro.is_ocean_node(id) {
            continue;
        }

        let elevation = grid.node(id).elevation;
        let mut peak = true;
        let mut out: Option<(NodeId, f32)> = None;
        for m in grid.node_neighbor_ids(id) {
            let me = grid.node(m).elevation;
            if elevation < me {
                peak = false;
            } else if elevation > me && out.map_or(elevation, |(_, best)| best) > me {
                out = Some((m, me));
            }
        }

        if peak {
            hydro.peaks.push(id);
        }
        if let Some((target, _)) = out {
            grid.node_mut(id).out_edge = Some(target);
            grid.node_mut(target).in_edges.push(id);
        }
    }
}
