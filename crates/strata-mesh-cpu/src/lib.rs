//! Face-culled surface extraction for voxel chunks.
#![forbid(unsafe_code)]

mod chunk;
mod emit;
mod face;
mod mesh_build;

pub use chunk::{ChunkSurfaces, build_chunk_surfaces};
pub use emit::{SurfaceKind, emit_voxel_quads, face_tile, occludes};
pub use face::Face;
pub use mesh_build::{MeshBuild, QUAD_TRIANGLES, Quad, Surface};
