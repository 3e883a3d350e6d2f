use std::time::Instant;

use rayon::prelude::*;
use strata_chunk::Chunk;
use strata_world::ChunkOrigin;

use crate::emit::{SurfaceKind, emit_voxel_quads};
use crate::mesh_build::{MeshBuild, Quad, Surface};

/// Renderable output for one chunk: opaque materials and water kept apart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkSurfaces {
    pub origin: ChunkOrigin,
    pub solid: Surface,
    pub fluid: Surface,
}

impl ChunkSurfaces {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.fluid.is_empty()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        (self.solid.indices.len() + self.fluid.indices.len()) / 6
    }
}

/// Builds both surfaces for `chunk`. Quads are produced per z-slab in parallel
/// and merged in flat-index order, so output is identical across thread counts.
pub fn build_chunk_surfaces(chunk: &Chunk) -> ChunkSurfaces {
    let t0 = Instant::now();
    // One z-slab per task; slabs are contiguous in flat order.
    let slab = chunk.dims.sx * chunk.dims.sy;
    let slabs: Vec<Vec<(SurfaceKind, Vec<Quad>)>> = (0..chunk.dims.sz)
        .into_par_iter()
        .map(|z| {
            (z * slab..(z + 1) * slab)
                .map(|i| emit_voxel_quads(chunk, i))
                .collect()
        })
        .collect();

    let mut solid = MeshBuild::new();
    let mut fluid = MeshBuild::new();
    for (kind, quads) in slabs.iter().flatten() {
        let build = match kind {
            SurfaceKind::Solid => &mut solid,
            SurfaceKind::Fluid => &mut fluid,
        };
        for q in quads {
            build.add_quad(q);
        }
    }
    let (nq_solid, nq_fluid) = (solid.quad_count(), fluid.quad_count());
    let out = ChunkSurfaces {
        origin: chunk.origin,
        solid: solid.finish(),
        fluid: fluid.finish(),
    };
    log::debug!(
        target: "perf",
        "surfaces origin=({}, {}, {}) solid_quads={} fluid_quads={} verts={} ms={}",
        chunk.origin.x,
        chunk.origin.y,
        chunk.origin.z,
        nq_solid,
        nq_fluid,
        out.solid.vertex_count() + out.fluid.vertex_count(),
        t0.elapsed().as_millis()
    );
    out
}
