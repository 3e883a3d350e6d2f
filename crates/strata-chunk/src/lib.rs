//! Chunk voxel/damage grids and the generation pass that fills them.
#![forbid(unsafe_code)]

mod generate;

pub use generate::{TREE_DESIGN, generate_chunk, grow_trees};

use strata_blocks::{UNDAMAGED, VoxelType};
use strata_geom::IVec3;
use strata_world::{ChunkDims, ChunkOrigin};

/// Fixed-size block of voxels. `voxels` and `damage` always hold
/// `dims.volume()` entries addressed by [`ChunkDims::index`].
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub origin: ChunkOrigin,
    pub dims: ChunkDims,
    voxels: Vec<VoxelType>,
    damage: Vec<VoxelType>,
}

impl Chunk {
    pub fn filled(origin: ChunkOrigin, dims: ChunkDims, v: VoxelType) -> Self {
        let n = dims.volume();
        Self {
            origin,
            dims,
            voxels: vec![v; n],
            damage: vec![UNDAMAGED; n],
        }
    }

    /// Wraps an existing grid of exactly `dims.volume()` voxels. Damage
    /// starts undamaged everywhere.
    pub fn from_voxels(origin: ChunkOrigin, dims: ChunkDims, voxels: Vec<VoxelType>) -> Self {
        let n = dims.volume();
        debug_assert_eq!(voxels.len(), n, "voxel grid does not match chunk volume");
        Self {
            origin,
            dims,
            voxels,
            damage: vec![UNDAMAGED; n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        self.dims.index(x, y, z)
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> VoxelType {
        self.voxels[self.idx(x, y, z)]
    }

    /// Voxel at a signed local position, `None` outside the chunk.
    #[inline]
    pub fn get_signed(&self, p: IVec3) -> Option<VoxelType> {
        self.dims.index_of(p).map(|i| self.voxels[i])
    }

    #[inline]
    pub fn voxel(&self, i: usize) -> VoxelType {
        self.voxels[i]
    }

    #[inline]
    pub fn damage(&self, i: usize) -> VoxelType {
        self.damage[i]
    }

    #[inline]
    pub fn set_voxel(&mut self, i: usize, v: VoxelType) {
        self.voxels[i] = v;
    }

    #[inline]
    pub fn set_damage(&mut self, i: usize, marker: VoxelType) {
        debug_assert!(marker.is_damage_marker());
        self.damage[i] = marker;
    }

    /// Writes `v` and clears the damage marker at `i`.
    #[inline]
    pub fn replace(&mut self, i: usize, v: VoxelType) {
        self.voxels[i] = v;
        self.damage[i] = UNDAMAGED;
    }

    #[inline]
    pub fn voxels(&self) -> &[VoxelType] {
        &self.voxels
    }

    #[inline]
    pub fn damage_grid(&self) -> &[VoxelType] {
        &self.damage
    }

    /// Local lattice position of flat index `i`.
    #[inline]
    pub fn local(&self, i: usize) -> IVec3 {
        self.dims.local_of(i)
    }

    /// World lattice position of flat index `i`.
    #[inline]
    pub fn world_pos(&self, i: usize) -> IVec3 {
        self.origin.as_ivec3() + self.dims.local_of(i)
    }

    #[inline]
    pub fn contains_world(&self, p: IVec3) -> bool {
        self.dims.contains_local(p - self.origin.as_ivec3())
    }

    #[inline]
    pub fn get_world(&self, p: IVec3) -> Option<VoxelType> {
        self.get_signed(p - self.origin.as_ivec3())
    }

    /// Flat index of world position `p`, if it lies inside this chunk.
    #[inline]
    pub fn index_of_world(&self, p: IVec3) -> Option<usize> {
        self.dims.index_of(p - self.origin.as_ivec3())
    }
}
