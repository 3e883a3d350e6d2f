use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use strata_blocks::VoxelType;
use strata_geom::IVec3;

use crate::config::{ChunkDims, NoiseLayers, WorldConfig};
use crate::coord::ChunkOrigin;
use crate::noise::NoiseField;

/// Chance that a tree-eligible surface voxel actually seeds a tree.
const TREE_CHANCE: f32 = 0.1;

/// Classifies voxels from the noise layers. Holds no per-chunk state, so one
/// instance serves every generation job.
pub struct VoxelGenerator {
    noise: NoiseField,
    layers: NoiseLayers,
    water_level: i32,
}

impl VoxelGenerator {
    pub fn new(cfg: &WorldConfig) -> Self {
        Self {
            noise: NoiseField::new(cfg.noise_seed),
            layers: cfg.layers.clone(),
            water_level: cfg.water_level,
        }
    }

    /// Integer terrain height of the column at world `(x, z)`.
    #[inline]
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        self.noise
            .evaluate_2d(x as f32, z as f32, &self.layers.surface) as i32
    }

    /// Material at world position `p`. Draws from `rng` only when a branch
    /// needs a uniform sample, in precedence order.
    pub fn classify<R: Rng>(&self, p: IVec3, rng: &mut R) -> VoxelType {
        if p.y == 0 {
            return VoxelType::Bedrock;
        }
        let l = &self.layers;
        let n = &self.noise;
        let (x, y, z) = (p.x as f32, p.y as f32, p.z as f32);

        if l.cave.enabled {
            let cave = n.evaluate_3d(x, y, z, &l.cave) as i32;
            if (cave as f32) < l.cave.threshold {
                return VoxelType::Air;
            }
        }

        let surface = self.surface_height(p.x, p.z);
        if p.y == surface {
            let tree_site = l.tree.enabled
                && ((n.evaluate_3d(x, y, z, &l.tree) as i32) as f32) < l.tree.threshold;
            if tree_site && rng.gen_range(0.0f32..=1.0) <= TREE_CHANCE {
                return VoxelType::WoodBase;
            }
            return VoxelType::GrassSide;
        }

        if l.ore_high.enabled {
            let top = n.evaluate_2d(x, z, &l.ore_high) as i32;
            let bottom = n.evaluate_2d(x, z, &l.ore_low) as i32;
            if p.y < top && p.y > bottom && rng.gen_range(0.0f32..=1.0) <= l.ore_high.threshold {
                return VoxelType::Diamond;
            }
        }

        if l.stone.enabled {
            let stone = n.evaluate_2d(x, z, &l.stone) as i32;
            if p.y < stone && rng.gen_range(0.0f32..=1.0) <= l.stone.threshold {
                return VoxelType::Stone;
            }
        }

        if p.y < surface {
            VoxelType::Dirt
        } else if p.y < self.water_level {
            VoxelType::Water
        } else {
            VoxelType::Air
        }
    }

    /// Classifies every voxel of the chunk at `origin` in parallel on the
    /// current rayon pool. `seeds[i]` feeds voxel `i`'s private stream, so the
    /// result does not depend on scheduling or thread count.
    pub fn classify_chunk(
        &self,
        origin: ChunkOrigin,
        dims: ChunkDims,
        seeds: &[u64],
    ) -> Vec<VoxelType> {
        assert_eq!(seeds.len(), dims.volume(), "one seed per voxel");
        let base = origin.as_ivec3();
        seeds
            .par_iter()
            .enumerate()
            .map(|(i, &seed)| {
                let mut rng = StdRng::seed_from_u64(seed);
                self.classify(base + dims.local_of(i), &mut rng)
            })
            .collect()
    }
}

/// Fresh per-voxel seeds for one chunk build.
pub fn seed_array<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> Vec<u64> {
    (0..len).map(|_| rng.next_u64()).collect()
}
