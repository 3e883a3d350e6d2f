use rand::RngCore;
use strata_blocks::{UNDAMAGED, VoxelType};
use strata_geom::IVec3;
use strata_world::{ChunkDims, ChunkOrigin, VoxelGenerator, seed_array};

use crate::Chunk;

/// Offsets written above every `WoodBase`: a trunk then a leaf.
pub const TREE_DESIGN: [(IVec3, VoxelType); 2] = [
    (IVec3::new(0, 1, 0), VoxelType::Wood),
    (IVec3::new(0, 2, 0), VoxelType::Leaves),
];

/// Fills a fresh chunk: per-voxel seeds from `rng`, parallel classification,
/// then the tree pass.
pub fn generate_chunk<R: RngCore + ?Sized>(
    generator: &VoxelGenerator,
    origin: ChunkOrigin,
    dims: ChunkDims,
    rng: &mut R,
) -> Chunk {
    let seeds = seed_array(rng, dims.volume());
    let voxels = generator.classify_chunk(origin, dims, &seeds);
    let mut chunk = Chunk::from_voxels(origin, dims, voxels);
    grow_trees(&mut chunk);
    chunk
}

/// Stamps [`TREE_DESIGN`] above each tree seed. Offsets leaving the chunk on
/// any axis are dropped; trees never grow into neighbours.
pub fn grow_trees(chunk: &mut Chunk) {
    let bases: Vec<usize> = (0..chunk.len())
        .filter(|&i| chunk.voxel(i) == VoxelType::WoodBase)
        .collect();
    for i in bases {
        let base = chunk.local(i);
        for (offset, v) in TREE_DESIGN {
            if let Some(j) = chunk.dims.index_of(base + offset) {
                chunk.set_voxel(j, v);
                chunk.set_damage(j, UNDAMAGED);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trees_clip_at_chunk_top() {
        let dims = ChunkDims::new(3, 3, 3);
        let mut c = Chunk::filled(ChunkOrigin::default(), dims, VoxelType::Air);
        let low = dims.index(0, 0, 0);
        let high = dims.index(2, 1, 2);
        c.set_voxel(low, VoxelType::WoodBase);
        c.set_voxel(high, VoxelType::WoodBase);
        grow_trees(&mut c);

        assert_eq!(c.get_local(0, 1, 0), VoxelType::Wood);
        assert_eq!(c.get_local(0, 2, 0), VoxelType::Leaves);
        assert_eq!(c.get_local(2, 2, 2), VoxelType::Wood);
        // the leaf above (2,2,2) is outside; nothing wraps into the next row
        let placed = c.voxels().iter().filter(|v| !v.is_air()).count();
        assert_eq!(placed, 2 + 3);
    }
}
