use serde::{Deserialize, Serialize};

/// Every voxel material plus the damage-overlay markers and the `Air` sentinel.
///
/// Discriminants are the persisted codes; do not reorder.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VoxelType {
    GrassTop = 0,
    GrassSide = 1,
    Dirt = 2,
    Water = 3,
    Stone = 4,
    Leaves = 5,
    Wood = 6,
    WoodBase = 7,
    Sand = 8,
    Gold = 9,
    Bedrock = 10,
    Redstone = 11,
    Diamond = 12,
    Undamaged = 13,
    Damage1 = 14,
    Damage2 = 15,
    Damage3 = 16,
    Damage4 = 17,
    #[default]
    Air = 18,
}

/// Damage marker every voxel starts with.
pub const UNDAMAGED: VoxelType = VoxelType::Undamaged;

// Indexed by code.
const DURABILITY: [i32; VoxelType::COUNT] = [
    2, 2, // grass top, grass side
    1, // dirt
    1, // water
    4, // stone
    2, // leaves
    4, 4, // wood, wood base
    1, // sand
    4, // gold
    -1, // bedrock
    3, // redstone
    4, // diamond
    -1, -1, -1, -1, -1, // damage markers
    -1, // air
];

impl VoxelType {
    pub const COUNT: usize = 19;

    pub const ALL: [VoxelType; VoxelType::COUNT] = [
        VoxelType::GrassTop,
        VoxelType::GrassSide,
        VoxelType::Dirt,
        VoxelType::Water,
        VoxelType::Stone,
        VoxelType::Leaves,
        VoxelType::Wood,
        VoxelType::WoodBase,
        VoxelType::Sand,
        VoxelType::Gold,
        VoxelType::Bedrock,
        VoxelType::Redstone,
        VoxelType::Diamond,
        VoxelType::Undamaged,
        VoxelType::Damage1,
        VoxelType::Damage2,
        VoxelType::Damage3,
        VoxelType::Damage4,
        VoxelType::Air,
    ];

    #[inline]
    pub fn code(self) -> i32 {
        self as u8 as i32
    }

    #[inline]
    pub fn from_code(code: i32) -> Option<VoxelType> {
        usize::try_from(code)
            .ok()
            .and_then(|i| VoxelType::ALL.get(i).copied())
    }

    /// Damage steps before the voxel breaks; `-1` for indestructible kinds.
    #[inline]
    pub fn durability(self) -> i32 {
        DURABILITY[self as usize]
    }

    #[inline]
    pub fn is_indestructible(self) -> bool {
        self.durability() < 0
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == VoxelType::Air
    }

    /// Falls under gravity when unsupported.
    #[inline]
    pub fn can_drop(self) -> bool {
        matches!(self, VoxelType::Sand | VoxelType::Water)
    }

    /// Spreads sideways into empty cells.
    #[inline]
    pub fn can_flow(self) -> bool {
        matches!(self, VoxelType::Water)
    }

    /// Air and water never hide a neighbour's face.
    #[inline]
    pub fn is_see_through(self) -> bool {
        matches!(self, VoxelType::Air | VoxelType::Water)
    }

    #[inline]
    pub fn is_damage_marker(self) -> bool {
        (VoxelType::Undamaged as u8..=VoxelType::Damage4 as u8).contains(&(self as u8))
    }

    /// Marker `level` steps above `Undamaged`, if one exists.
    #[inline]
    pub fn damage_marker(level: u8) -> Option<VoxelType> {
        if level > 4 {
            return None;
        }
        VoxelType::from_code(VoxelType::Undamaged.code() + level as i32)
    }

    /// Number of steps this marker sits above `Undamaged`.
    #[inline]
    pub fn damage_level(self) -> Option<u8> {
        self.is_damage_marker()
            .then(|| (self.code() - VoxelType::Undamaged.code()) as u8)
    }

    /// Materials a player can place (every non-marker, non-air kind).
    pub fn placeable() -> impl Iterator<Item = VoxelType> {
        VoxelType::ALL
            .into_iter()
            .filter(|v| !v.is_damage_marker() && !v.is_air())
    }
}
