//! Voxel type catalogue: material codes and properties plus atlas tiles.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod types;

pub use atlas::{TileUvs, block_tile, damage_tile};
pub use types::{UNDAMAGED, VoxelType};
