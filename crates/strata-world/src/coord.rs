use serde::{Deserialize, Serialize};
use strata_geom::IVec3;

use crate::config::ChunkDims;

/// World-space position of a chunk's minimum corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkOrigin {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkOrigin {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn column(self) -> ColumnKey {
        ColumnKey::new(self.x, self.z)
    }

    /// Origin of the chunk `steps` chunk-widths away on each axis.
    #[inline]
    pub fn offset_chunks(self, dims: ChunkDims, steps: IVec3) -> Self {
        let d = dims.as_ivec3();
        Self {
            x: self.x + steps.x * d.x,
            y: self.y + steps.y * d.y,
            z: self.z + steps.z * d.z,
        }
    }

    /// Origin of the chunk containing world voxel `p`.
    #[inline]
    pub fn containing(p: IVec3, dims: ChunkDims) -> Self {
        let d = dims.as_ivec3();
        Self {
            x: p.x.div_euclid(d.x) * d.x,
            y: p.y.div_euclid(d.y) * d.y,
            z: p.z.div_euclid(d.z) * d.z,
        }
    }

    /// True when the origin sits on the chunk lattice.
    #[inline]
    pub fn is_aligned(self, dims: ChunkDims) -> bool {
        let d = dims.as_ivec3();
        self.x.rem_euclid(d.x) == 0 && self.y.rem_euclid(d.y) == 0 && self.z.rem_euclid(d.z) == 0
    }
}

impl From<(i32, i32, i32)> for ChunkOrigin {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkOrigin> for (i32, i32, i32) {
    fn from(value: ChunkOrigin) -> Self {
        (value.x, value.y, value.z)
    }
}

/// World-space `(x, z)` of a vertical stack of chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub x: i32,
    pub z: i32,
}

impl ColumnKey {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn distance_sq(self, other: ColumnKey) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dz = i64::from(self.z - other.z);
        dx * dx + dz * dz
    }

    /// Chunk origin in vertical slot `slot` of this column.
    #[inline]
    pub fn origin_at(self, slot: i32, dims: ChunkDims) -> ChunkOrigin {
        ChunkOrigin::new(self.x, slot * dims.sy as i32, self.z)
    }
}

impl From<(i32, i32)> for ColumnKey {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_positions() {
        let dims = ChunkDims::new(10, 10, 10);
        assert_eq!(
            ChunkOrigin::containing(IVec3::new(-1, 0, 19), dims),
            ChunkOrigin::new(-10, 0, 10)
        );
        assert_eq!(
            ChunkOrigin::containing(IVec3::new(0, 9, -10), dims),
            ChunkOrigin::new(0, 0, -10)
        );
    }

    #[test]
    fn offset_chunks_steps_by_dims() {
        let dims = ChunkDims::new(4, 8, 2);
        let o = ChunkOrigin::new(4, 8, 2).offset_chunks(dims, IVec3::new(-1, 1, 3));
        assert_eq!(o, ChunkOrigin::new(0, 16, 8));
        assert!(o.is_aligned(dims));
        assert!(!ChunkOrigin::new(1, 0, 0).is_aligned(dims));
    }

    #[test]
    fn column_distance() {
        let a = ColumnKey::new(0, 0);
        assert_eq!(a.distance_sq(ColumnKey::new(30, -40)), 2500);
        assert_eq!(a.origin_at(2, ChunkDims::new(4, 4, 4)), ChunkOrigin::new(0, 8, 0));
    }
}
