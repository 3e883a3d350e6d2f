//! World configuration plus the noise layers and voxel classification built on it.
#![forbid(unsafe_code)]

pub mod config;
pub mod coord;
pub mod generation;
pub mod noise;

pub use config::{
    ChunkDims, ConfigError, Extent, NoiseLayer, NoiseLayers, TimingConfig, WorldConfig,
    load_config_from_path,
};
pub use coord::{ChunkOrigin, ColumnKey};
pub use generation::{VoxelGenerator, seed_array};
pub use noise::NoiseField;
