pub mod axial;
pub mod biome;
pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod hydrology;
pub mod noisefield;
pub mod pathfinder;

pub use axial::{Axial, NodeKey};
pub use biome::Biome;
pub use board::{Board, BoardReport};
pub use config::BoardParams;
pub use error::{GenError, Result};
pub use grid::{Node, NodeId, Tile, TileId};
pub use hydrology::River;
pub use noisefield::NoiseField;
pub use pathfinder::Traversal;
