use hashbrown::{HashMap, HashSet};
use strata_chunk::Chunk;
use strata_geom::IVec3;
use strata_mesh_cpu::{ChunkSurfaces, build_chunk_surfaces};
use strata_world::{ChunkDims, ChunkOrigin, ColumnKey};

/// A chunk grid, its two surfaces and one visibility flag covering both.
pub struct ChunkEntry {
    pub chunk: Chunk,
    pub surfaces: ChunkSurfaces,
    pub visible: bool,
}

impl ChunkEntry {
    /// Wraps `chunk` and builds its surfaces.
    pub fn new(chunk: Chunk, visible: bool) -> Self {
        let surfaces = build_chunk_surfaces(&chunk);
        Self {
            chunk,
            surfaces,
            visible,
        }
    }

    #[inline]
    pub fn origin(&self) -> ChunkOrigin {
        self.chunk.origin
    }

    pub fn rebuild(&mut self) {
        self.surfaces = build_chunk_surfaces(&self.chunk);
    }
}

/// Owns every chunk created this session. Chunks are never removed; known
/// origins and columns keep insertion order.
pub struct ChunkStore {
    dims: ChunkDims,
    entries: HashMap<ChunkOrigin, ChunkEntry>,
    order: Vec<ChunkOrigin>,
    columns: Vec<ColumnKey>,
    column_set: HashSet<ColumnKey>,
}

impl ChunkStore {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            entries: HashMap::new(),
            order: Vec::new(),
            columns: Vec::new(),
            column_set: HashSet::new(),
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stores `entry` under its origin. A replaced entry keeps its place in
    /// the ordering. Returns true when the origin was new.
    pub fn insert(&mut self, entry: ChunkEntry) -> bool {
        let origin = entry.origin();
        debug_assert_eq!(entry.chunk.dims, self.dims);
        let fresh = self.entries.insert(origin, entry).is_none();
        if fresh {
            self.order.push(origin);
        }
        fresh
    }

    #[inline]
    pub fn contains(&self, origin: ChunkOrigin) -> bool {
        self.entries.contains_key(&origin)
    }

    #[inline]
    pub fn get(&self, origin: ChunkOrigin) -> Option<&ChunkEntry> {
        self.entries.get(&origin)
    }

    #[inline]
    pub fn get_mut(&mut self, origin: ChunkOrigin) -> Option<&mut ChunkEntry> {
        self.entries.get_mut(&origin)
    }

    /// Known chunk origins in insertion order.
    #[inline]
    pub fn origins(&self) -> &[ChunkOrigin] {
        &self.order
    }

    /// Known columns in insertion order.
    #[inline]
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    #[inline]
    pub fn has_column(&self, col: ColumnKey) -> bool {
        self.column_set.contains(&col)
    }

    /// Records `col`; returns false if it was already known.
    pub fn add_column(&mut self, col: ColumnKey) -> bool {
        let fresh = self.column_set.insert(col);
        if fresh {
            self.columns.push(col);
        }
        fresh
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &ChunkEntry> + '_ {
        self.order.iter().filter_map(|o| self.entries.get(o))
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &ChunkEntry> + '_ {
        self.entries().filter(|e| e.visible)
    }

    /// Returns false if `origin` is unknown.
    pub fn set_visible(&mut self, origin: ChunkOrigin, visible: bool) -> bool {
        match self.entries.get_mut(&origin) {
            Some(e) => {
                e.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Applies `visible` to every known chunk in the `world_height` slots of
    /// the column.
    pub fn set_column_visible(&mut self, col: ColumnKey, visible: bool, world_height: i32) {
        for slot in 0..world_height {
            self.set_visible(col.origin_at(slot, self.dims), visible);
        }
    }

    /// Owning chunk origin and flat index of world voxel `p`, if that chunk
    /// is known.
    pub fn locate(&self, p: IVec3) -> Option<(ChunkOrigin, usize)> {
        let origin = ChunkOrigin::containing(p, self.dims);
        let entry = self.entries.get(&origin)?;
        entry.chunk.index_of_world(p).map(|i| (origin, i))
    }

    /// Re-runs the surface builder for `origin`; false if it is unknown.
    pub fn rebuild_surfaces(&mut self, origin: ChunkOrigin) -> bool {
        match self.entries.get_mut(&origin) {
            Some(e) => {
                e.rebuild();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::VoxelType;

    fn entry(origin: ChunkOrigin, dims: ChunkDims, v: VoxelType) -> ChunkEntry {
        ChunkEntry::new(Chunk::filled(origin, dims, v), true)
    }

    #[test]
    fn origins_keep_insertion_order() {
        let dims = ChunkDims::new(2, 2, 2);
        let mut s = ChunkStore::new(dims);
        let a = ChunkOrigin::new(4, 0, 0);
        let b = ChunkOrigin::new(-2, 2, 0);
        assert!(s.insert(entry(a, dims, VoxelType::Air)));
        assert!(s.insert(entry(b, dims, VoxelType::Air)));
        assert!(!s.insert(entry(a, dims, VoxelType::Stone)));
        assert_eq!(s.origins(), &[a, b]);
        assert_eq!(s.get(a).unwrap().chunk.voxel(0), VoxelType::Stone);
    }

    #[test]
    fn locate_handles_negative_coordinates() {
        let dims = ChunkDims::new(4, 4, 4);
        let mut s = ChunkStore::new(dims);
        let o = ChunkOrigin::new(-4, 0, -4);
        s.insert(entry(o, dims, VoxelType::Dirt));
        let (origin, i) = s.locate(IVec3::new(-1, 3, -4)).unwrap();
        assert_eq!(origin, o);
        assert_eq!(s.get(o).unwrap().chunk.local(i), IVec3::new(3, 3, 0));
        assert!(s.locate(IVec3::new(0, 0, 0)).is_none());
    }

    #[test]
    fn column_visibility_spans_all_slots() {
        let dims = ChunkDims::new(2, 2, 2);
        let mut s = ChunkStore::new(dims);
        let col = ColumnKey::new(2, 0);
        for slot in 0..3 {
            s.insert(entry(col.origin_at(slot, dims), dims, VoxelType::Stone));
        }
        assert!(s.add_column(col));
        assert!(!s.add_column(col));
        s.set_column_visible(col, false, 3);
        assert_eq!(s.visible_entries().count(), 0);
        assert!(s.entries().all(|e| !e.surfaces.is_empty()));
        s.set_column_visible(col, true, 3);
        assert_eq!(s.visible_entries().count(), 3);
    }

    #[test]
    fn rebuild_reflects_grid_changes() {
        let dims = ChunkDims::new(2, 2, 2);
        let mut s = ChunkStore::new(dims);
        let o = ChunkOrigin::default();
        s.insert(entry(o, dims, VoxelType::Air));
        assert!(s.get(o).unwrap().surfaces.is_empty());
        s.get_mut(o).unwrap().chunk.set_voxel(0, VoxelType::Sand);
        assert!(s.rebuild_surfaces(o));
        assert_eq!(s.get(o).unwrap().surfaces.quad_count(), 6);
        assert!(!s.rebuild_surfaces(ChunkOrigin::new(2, 0, 0)));
    }
}
