use strata_blocks::{TileUvs, VoxelType, block_tile, damage_tile};
use strata_chunk::Chunk;
use strata_geom::{IVec3, Vec2, Vec3};

use crate::face::Face;
use crate::mesh_build::Quad;

// Corner k of a face takes atlas corner CORNER_UV[k].
const CORNER_UV: [usize; 4] = [3, 2, 0, 1];

/// Which output surface a voxel's quads belong to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SurfaceKind {
    Solid,
    Fluid,
}

impl SurfaceKind {
    #[inline]
    pub fn of(v: VoxelType) -> SurfaceKind {
        if v == VoxelType::Water {
            SurfaceKind::Fluid
        } else {
            SurfaceKind::Solid
        }
    }
}

/// True when the voxel at local `p` hides the face of an adjacent `me`.
/// Positions outside the chunk never hide anything.
#[inline]
pub fn occludes(chunk: &Chunk, p: IVec3, me: VoxelType) -> bool {
    match chunk.get_signed(p) {
        Some(n) => n == me || !n.is_see_through(),
        None => false,
    }
}

/// Material tile shown on `face` of `v`. Grass sides show grass on top and dirt
/// underneath.
#[inline]
pub fn face_tile(v: VoxelType, face: Face) -> Option<TileUvs> {
    let shown = match (v, face) {
        (VoxelType::GrassSide, Face::PosY) => VoxelType::GrassTop,
        (VoxelType::GrassSide, Face::NegY) => VoxelType::Dirt,
        _ => v,
    };
    block_tile(shown)
}

#[inline]
fn lay(tile: &TileUvs) -> [Vec2; 4] {
    CORNER_UV.map(|k| tile[k])
}

/// Visible quads of the voxel at flat index `i`, in world space, together with
/// the surface they go to. Air yields nothing.
pub fn emit_voxel_quads(chunk: &Chunk, i: usize) -> (SurfaceKind, Vec<Quad>) {
    let v = chunk.voxel(i);
    let kind = SurfaceKind::of(v);
    if v.is_air() {
        return (kind, Vec::new());
    }
    let local = chunk.local(i);
    let centre = chunk.world_pos(i).as_vec3();
    let overlay = lay(&damage_tile(chunk.damage(i)));
    let mut quads = Vec::new();
    for face in Face::ALL {
        if occludes(chunk, local + face.step(), v) {
            continue;
        }
        let Some(tile) = face_tile(v, face) else {
            continue;
        };
        let corners = face.corners().map(|c: Vec3| centre + c);
        quads.push(Quad {
            corners,
            normal: face.normal(),
            uv0: lay(&tile),
            uv1: overlay,
        });
    }
    (kind, quads)
}
