//! Block-level mutations: damage, healing, placement, gravity and liquid flow.
#![forbid(unsafe_code)]

mod engine;
mod neighbor;

pub use engine::{DamageOutcome, EditStats, EditTask, MutationEngine};
pub use neighbor::resolve_neighbor;

use strata_blocks::VoxelType;
use strata_geom::IVec3;
use strata_world::ChunkOrigin;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("chunk at {0:?} is not loaded")]
    UnknownChunk(ChunkOrigin),

    #[error("no loaded chunk contains voxel {0:?}")]
    Unresolved(IVec3),

    #[error("voxel index {index} out of range for chunk of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0:?} cannot be placed")]
    NotPlaceable(VoxelType),
}
