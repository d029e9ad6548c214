// src/hydrology/rivers.rs
//! Синтез рек: сопровождение потоков по стоковому лесу.

use super::Hydrology;
use crate::board::{EVAP, RIVER_LIMIT, RIVER_THRESHOLD};
use crate::grid::{HexGrid, NodeId};
use std::collections::{BTreeMap, VecDeque};

/// Зарегистрированная река.
#[derive(Debug, Clone)]
pub struct River {
    /// Вершины от истока к устью после обрезки маловодного начала.
    pub nodes: Vec<NodeId>,
    /// Объём в истоке после обрезки.
    pub head_volume: f32,
    /// Устье лежит в океанской вершине.
    pub reaches_ocean: bool,
}

impl River {
    /// Устье реки.
    #[must_use]
    pub fn mouth(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

/// Рукава, пришедшие в вершину слияния, пока не собрались все.
struct Confluence {
    stream: Vec<NodeId>,
    volume: f32,
    arrivals: usize,
}

/// Сопровождает потоки от пиков вниз по стоковому лесу.
///
/// Поток ключуется вершиной своего текущего конца, так что через вершину
/// проходит не больше одного потока. На каждом шаге объём конца доставляется
/// по выходному ребру; приёмник с единственным притоком продлевает поток, а
/// вершина слияния ждёт все рукава и оставляет себе рукав с наибольшим
/// доставленным объёмом, при равенстве первый пришедший. После каждой
/// доставки приёмник испаряется: остаётся `EVAP` от суммы накопленного и
/// влажности тайла-владельца. Строго более низкие соседи без притоков
/// зарождают собственные ручьи. Океанская вершина поток останавливает;
/// сухопутный локальный минимум поглощает его без следа. Уцелевшие потоки
/// обрезаются спереди до порога объёма и регистрируются, если длина не
/// меньше `RIVER_LIMIT` либо короче, но устье в океане.
pub(crate) fn make_rivers(grid: &mut HexGrid, hydro: &mut Hydrology) {
    let mut streams: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    let mut pending: BTreeMap<NodeId, Confluence> = BTreeMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    // Все потоки начинаются на пиках с влажностью тайла-владельца.
    for &peak in &hydro.peaks {
        let owner = grid.node(peak).owner;
        grid.node_mut(peak).volume = grid.tile(owner).moisture;
        streams.insert(peak, vec![peak]);
        queue.push_back(peak);
    }

    while let Some(m) = queue.pop_front() {
        // Повторная постановка застаёт вершину уже без потока.
        let Some(stream) = streams.remove(&m) else {
            continue;
        };
        // Локальный минимум на суше: поток кончается без регистрации.
        let Some(out) = grid.node(m).out_edge else {
            continue;
        };
        let elevation = grid.node(m).elevation;
        let delivered = grid.node(m).volume;

        grid.node_mut(out).volume += delivered;
        let in_degree = grid.node(out).in_edges.len();
        if in_degree == 1 {
            let mut extended = stream;
            extended.push(out);
            streams.entry(out).or_insert(extended);
            if !hydro.is_ocean_node(out) {
                queue.push_back(out);
            }
            evaporate(grid, out);
        } else {
            let mut extended = stream;
            extended.push(out);
            let complete = match pending.get_mut(&out) {
                Some(c) => {
                    c.arrivals += 1;
                    if delivered > c.volume {
                        c.stream = extended;
                        c.volume = delivered;
                    }
                    c.arrivals == in_degree
                }
                None => {
                    pending.insert(
                        out,
                        Confluence {
                            stream: extended,
                            volume: delivered,
                            arrivals: 1,
                        },
                    );
                    false
                }
            };
            if complete {
                if let Some(won) = pending.remove(&out) {
                    streams.insert(out, won.stream);
                }
                if !hydro.is_ocean_node(out) {
                    queue.push_back(out);
                }
                evaporate(grid, out);
            }
        }

        // Боковые ручьи: строго более низкий сосед без притоков и без
        // своего потока.
        for s in grid.node_neighbor_ids(m) {
            if s == out {
                continue;
            }
            if grid.node(s).elevation < elevation
                && grid.node(s).in_edges.is_empty()
                && !streams.contains_key(&s)
            {
                let owner = grid.node(s).owner;
                grid.node_mut(s).volume = grid.tile(owner).moisture;
                streams.insert(s, vec![s]);
                if !hydro.is_ocean_node(s) {
                    queue.push_back(s);
                }
            }
        }
    }

    // Осталось только упёршееся в океан. Маловодное начало обрезается,
    // слишком короткие обрезки отбрасываются.
    for (tail, stream) in streams {
        let mut start = 0;
        while start < stream.len() && grid.node(stream[start]).volume < RIVER_THRESHOLD {
            start += 1;
        }
        let trimmed = &stream[start..];
        let reaches_ocean = hydro.is_ocean_node(tail);
        if trimmed.len() >= RIVER_LIMIT || (trimmed.len() > 1 && reaches_ocean) {
            hydro.rivers.push(River {
                nodes: trimmed.to_vec(),
                head_volume: grid.node(trimmed[0]).volume,
                reaches_ocean,
            });
        }
    }
}

fn evaporate(grid: &mut HexGrid, id: NodeId) {
    let owner = grid.node(id).owner;
    let moisture = grid.tile(owner).moisture;
    let node = grid.node_mut(id);
    node.volume = EVAP * (node.volume + moisture);
}
