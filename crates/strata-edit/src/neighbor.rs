use strata_geom::IVec3;
use strata_runtime::ChunkStore;
use strata_world::ChunkOrigin;

/// Resolves a local position relative to the chunk at `origin`, which may lie
/// one step outside it, to the owning chunk and flat index. Positions past a
/// face land in the adjacent chunk with the coordinate wrapped. `None` when
/// that chunk is not loaded.
pub fn resolve_neighbor(
    store: &ChunkStore,
    origin: ChunkOrigin,
    local: IVec3,
) -> Option<(ChunkOrigin, usize)> {
    let dims = store.dims();
    if let Some(i) = dims.index_of(local) {
        return store.contains(origin).then_some((origin, i));
    }
    let world = origin.as_ivec3() + local;
    let hit = store.locate(world);
    if hit.is_none() {
        log::debug!(
            target: "edit",
            "neighbour of ({}, {}, {}) at local ({}, {}, {}) not loaded",
            origin.x,
            origin.y,
            origin.z,
            local.x,
            local.y,
            local.z
        );
    }
    hit
}
