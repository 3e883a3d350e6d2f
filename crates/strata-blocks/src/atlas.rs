//! Atlas tile coordinates per voxel type.
//!
//! Each tile lists its corners as `[uv00, uv10, uv01, uv11]` on a 16×16 atlas.
use strata_geom::Vec2;

use crate::types::VoxelType;

pub type TileUvs = [Vec2; 4];

const fn tile(u0: f32, v0: f32, u1: f32, v1: f32) -> TileUvs {
    [
        Vec2::new(u0, v0),
        Vec2::new(u1, v0),
        Vec2::new(u0, v1),
        Vec2::new(u1, v1),
    ]
}

// Indexed by code; Air has no tile.
const TILES: [TileUvs; VoxelType::COUNT - 1] = [
    tile(0.125, 0.375, 0.1875, 0.4375),   // grass top
    tile(0.1875, 0.9375, 0.25, 1.0),      // grass side
    tile(0.125, 0.9375, 0.1875, 1.0),     // dirt
    tile(0.875, 0.125, 0.9375, 0.1875),   // water
    tile(0.0, 0.875, 0.0625, 0.9375),     // stone
    tile(0.0625, 0.375, 0.125, 0.4375),   // leaves
    tile(0.375, 0.625, 0.4375, 0.6875),   // wood
    tile(0.375, 0.625, 0.4375, 0.6875),   // wood base
    tile(0.125, 0.875, 0.1875, 0.9375),   // sand
    tile(0.0, 0.8125, 0.0625, 0.875),     // gold
    tile(0.3125, 0.8125, 0.375, 0.875),   // bedrock
    tile(0.1875, 0.75, 0.25, 0.8125),     // redstone
    tile(0.125, 0.75, 0.1875, 0.8125),    // diamond
    tile(0.6875, 0.0, 0.75, 0.0625),      // undamaged
    tile(0.0, 0.0, 0.0625, 0.0625),       // damage 1
    tile(0.0625, 0.0, 0.125, 0.0625),     // damage 2
    tile(0.125, 0.0, 0.1875, 0.0625),     // damage 3
    tile(0.1875, 0.0, 0.25, 0.0625),      // damage 4
];

/// Material tile for `v`, or `None` for `Air`.
#[inline]
pub fn block_tile(v: VoxelType) -> Option<TileUvs> {
    TILES.get(v as usize).copied()
}

/// Overlay tile for a damage marker. Non-marker values read as undamaged.
#[inline]
pub fn damage_tile(marker: VoxelType) -> TileUvs {
    if marker.is_damage_marker() {
        TILES[marker as usize]
    } else {
        TILES[VoxelType::Undamaged as usize]
    }
}
