use strata_blocks::VoxelType;
use strata_geom::{IVec3, Vec3};

/// Requests from input collaborators, applied at the start of the next tick
/// in the order they were sent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// One hit on the voxel at a world position.
    Damage { pos: IVec3 },
    /// Place a voxel; `None` uses the selected place type.
    Place { pos: IVec3, voxel: Option<VoxelType> },
    SelectPlaceType(VoxelType),
    MoveObserver(Vec3),
    Save,
}
