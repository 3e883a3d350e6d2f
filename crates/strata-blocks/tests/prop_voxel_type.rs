use proptest::prelude::*;
use serde::Deserialize;
use strata_blocks::{UNDAMAGED, VoxelType};

fn any_voxel() -> impl Strategy<Value = VoxelType> {
    (0usize..VoxelType::COUNT).prop_map(|i| VoxelType::ALL[i])
}

proptest! {
    // codes round-trip through the persisted integer form
    #[test]
    fn code_roundtrip(v in any_voxel()) {
        prop_assert_eq!(VoxelType::from_code(v.code()), Some(v));
    }

    // unknown codes never decode
    #[test]
    fn out_of_range_codes_rejected(c in prop_oneof![i32::MIN..0, (VoxelType::COUNT as i32)..i32::MAX]) {
        prop_assert_eq!(VoxelType::from_code(c), None);
    }

    // every finite durability leaves room for at least one damage marker step
    #[test]
    fn finite_durability_fits_marker_range(v in any_voxel()) {
        let d = v.durability();
        if d > 0 {
            prop_assert!(VoxelType::damage_marker(d as u8).is_some());
            prop_assert!(!v.is_damage_marker());
            prop_assert!(!v.is_air());
        } else {
            prop_assert_eq!(d, -1);
        }
    }

    // only drop-eligible kinds may flow
    #[test]
    fn flow_implies_drop(v in any_voxel()) {
        if v.can_flow() {
            prop_assert!(v.can_drop());
        }
    }
}

#[test]
fn placeable_excludes_markers_and_air() {
    let all: Vec<_> = VoxelType::placeable().collect();
    assert!(all.contains(&VoxelType::Sand));
    assert!(!all.contains(&UNDAMAGED));
    assert!(!all.contains(&VoxelType::Air));
    assert_eq!(all.len(), 13);
}

#[test]
fn deserializes_snake_case_names() {
    #[derive(Deserialize)]
    struct Doc {
        place: VoxelType,
    }
    let doc: Doc = toml::from_str("place = \"wood_base\"").unwrap();
    assert_eq!(doc.place, VoxelType::WoodBase);
}
