use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_blocks::VoxelType;
use strata_geom::Vec3;
use strata_runtime::ChunkStore;
use strata_world::{ChunkOrigin, ColumnKey, WorldConfig};

use crate::PersistError;

/// Everything needed to rebuild a session: chunk grids in store order, their
/// visibility, the known columns and where the observer stood.
///
/// Integer fields are flattened: `chunk_origins` holds `x, y, z` triples,
/// `columns` holds `x, z` pairs and `voxels` holds each chunk's codes in
/// flat-index order, one chunk after another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    pub chunk_origins: Vec<i32>,
    pub columns: Vec<i32>,
    pub voxels: Vec<i32>,
    pub visibility: Vec<bool>,
    pub observer: [f32; 3],
}

/// One validated chunk ready to insert.
#[derive(Clone, Debug, PartialEq)]
pub struct RestoredChunk {
    pub origin: ChunkOrigin,
    pub voxels: Vec<VoxelType>,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RestoredWorld {
    pub chunks: Vec<RestoredChunk>,
    pub columns: Vec<ColumnKey>,
    pub observer: Vec3,
}

impl WorldData {
    pub fn capture(store: &ChunkStore, observer: Vec3) -> Self {
        let volume = store.dims().volume();
        let mut data = WorldData {
            chunk_origins: Vec::with_capacity(store.len() * 3),
            columns: Vec::with_capacity(store.columns().len() * 2),
            voxels: Vec::with_capacity(store.len() * volume),
            visibility: Vec::with_capacity(store.len()),
            observer: observer.to_array(),
        };
        for entry in store.entries() {
            let o = entry.origin();
            data.chunk_origins.extend([o.x, o.y, o.z]);
            data.voxels
                .extend(entry.chunk.voxels().iter().map(|v| v.code()));
            data.visibility.push(entry.visible);
        }
        for col in store.columns() {
            data.columns.extend([col.x, col.z]);
        }
        data
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunk_origins.len() / 3
    }

    /// Checks the record against the chunk dimensions and world height of
    /// `cfg` and decodes it.
    pub fn restore(&self, cfg: &WorldConfig) -> Result<RestoredWorld, PersistError> {
        let dims = cfg.chunk;
        let top = cfg.world.y.saturating_mul(dims.sy as i32);
        if self.chunk_origins.len() % 3 != 0 {
            return Err(PersistError::Mismatch(format!(
                "chunk_origins has {} values, not a multiple of 3",
                self.chunk_origins.len()
            )));
        }
        if self.columns.len() % 2 != 0 {
            return Err(PersistError::Mismatch(format!(
                "columns has {} values, not a multiple of 2",
                self.columns.len()
            )));
        }
        let n = self.chunk_count();
        let volume = dims.volume();
        if self.voxels.len() != n * volume {
            return Err(PersistError::Mismatch(format!(
                "expected {} voxels for {} chunks of {}x{}x{}, found {}",
                n * volume,
                n,
                dims.sx,
                dims.sy,
                dims.sz,
                self.voxels.len()
            )));
        }
        if self.visibility.len() != n {
            return Err(PersistError::Mismatch(format!(
                "expected {} visibility flags, found {}",
                n,
                self.visibility.len()
            )));
        }
        if self.observer.iter().any(|c| !c.is_finite()) {
            return Err(PersistError::Mismatch("observer position is not finite".into()));
        }

        let mut seen = HashSet::with_capacity(n);
        let mut chunks = Vec::with_capacity(n);
        for (k, xyz) in self.chunk_origins.chunks_exact(3).enumerate() {
            let origin = ChunkOrigin::new(xyz[0], xyz[1], xyz[2]);
            if !origin.is_aligned(dims) {
                return Err(PersistError::Mismatch(format!(
                    "chunk origin {:?} is off the chunk lattice",
                    origin
                )));
            }
            if origin.y < 0 || origin.y >= top {
                return Err(PersistError::Mismatch(format!(
                    "chunk origin {:?} is outside world height 0..{}",
                    origin, top
                )));
            }
            if !seen.insert(origin) {
                return Err(PersistError::Mismatch(format!(
                    "chunk origin {:?} appears twice",
                    origin
                )));
            }
            let codes = &self.voxels[k * volume..(k + 1) * volume];
            let voxels = codes
                .iter()
                .map(|&c| {
                    VoxelType::from_code(c).ok_or_else(|| {
                        PersistError::Mismatch(format!("unknown voxel code {c} in chunk {k}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            chunks.push(RestoredChunk {
                origin,
                voxels,
                visible: self.visibility[k],
            });
        }
        let columns: Vec<ColumnKey> = self
            .columns
            .chunks_exact(2)
            .map(|xz| ColumnKey::new(xz[0], xz[1]))
            .collect();
        let listed: HashSet<ColumnKey> = columns.iter().copied().collect();
        if listed.len() != columns.len() {
            return Err(PersistError::Mismatch("a column appears twice".into()));
        }
        let occupied: HashSet<ColumnKey> = chunks.iter().map(|c| c.origin.column()).collect();
        if let Some(col) = occupied.difference(&listed).next() {
            return Err(PersistError::Mismatch(format!(
                "chunks in column ({}, {}) but the column is not listed",
                col.x, col.z
            )));
        }
        if let Some(col) = listed.difference(&occupied).next() {
            return Err(PersistError::Mismatch(format!(
                "column ({}, {}) is listed but holds no chunk",
                col.x, col.z
            )));
        }
        Ok(RestoredWorld {
            chunks,
            columns,
            observer: Vec3::from(self.observer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::{ChunkDims, Extent};

    fn config(dims: ChunkDims) -> WorldConfig {
        let mut cfg = WorldConfig::default();
        cfg.chunk = dims;
        cfg.world = Extent { x: 2, y: 1, z: 2 };
        cfg
    }

    fn one_chunk(dims: ChunkDims) -> WorldData {
        WorldData {
            chunk_origins: vec![0, 0, 0],
            columns: vec![0, 0],
            voxels: vec![VoxelType::Stone.code(); dims.volume()],
            visibility: vec![true],
            observer: [1.0, 2.0, 3.0],
        }
    }

    #[test]
    fn well_formed_record_restores() {
        let dims = ChunkDims::new(2, 2, 2);
        let w = one_chunk(dims).restore(&config(dims)).unwrap();
        assert_eq!(w.chunks.len(), 1);
        assert_eq!(w.chunks[0].voxels, vec![VoxelType::Stone; 8]);
        assert_eq!(w.columns, vec![ColumnKey::new(0, 0)]);
        assert_eq!(w.observer, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn wrong_dims_are_a_mismatch() {
        let data = one_chunk(ChunkDims::new(2, 2, 2));
        assert!(matches!(
            data.restore(&config(ChunkDims::new(3, 2, 2))),
            Err(PersistError::Mismatch(_))
        ));
    }

    #[test]
    fn bad_codes_and_layouts_are_rejected() {
        let dims = ChunkDims::new(2, 2, 2);
        let mut bad_code = one_chunk(dims);
        bad_code.voxels[3] = 19;
        let mut ragged = one_chunk(dims);
        ragged.chunk_origins.push(2);
        let mut odd_columns = one_chunk(dims);
        odd_columns.columns.push(4);
        let mut unaligned = one_chunk(dims);
        unaligned.chunk_origins = vec![1, 0, 0];
        let mut dup = one_chunk(dims);
        dup.chunk_origins.extend([0, 0, 0]);
        dup.voxels.extend(vec![0; 8]);
        dup.visibility.push(false);
        let mut flags = one_chunk(dims);
        flags.visibility.clear();
        let mut too_high = one_chunk(dims);
        too_high.chunk_origins = vec![0, 2, 0];
        let mut below_ground = one_chunk(dims);
        below_ground.chunk_origins = vec![0, -2, 0];
        let mut stray_column = one_chunk(dims);
        stray_column.columns.extend([400, 400]);
        let mut unlisted = one_chunk(dims);
        unlisted.columns = vec![2, 0];
        let mut repeated = one_chunk(dims);
        repeated.columns.extend([0, 0]);
        let cfg = config(dims);
        for data in [
            bad_code,
            ragged,
            odd_columns,
            unaligned,
            dup,
            flags,
            too_high,
            below_ground,
            stray_column,
            unlisted,
            repeated,
        ] {
            assert!(matches!(data.restore(&cfg), Err(PersistError::Mismatch(_))), "{data:?}");
        }
    }
}
