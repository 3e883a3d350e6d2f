use strata_blocks::{UNDAMAGED, VoxelType};
use strata_chunk::Chunk;
use strata_geom::Vec3;
use strata_io::{PersistError, WorldData, load_world, save_path, save_world};
use strata_runtime::{ChunkEntry, ChunkStore};
use strata_world::{ChunkDims, ChunkOrigin, ColumnKey, WorldConfig};

fn config() -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.chunk = ChunkDims::new(3, 2, 3);
    cfg
}

fn sample_store(dims: ChunkDims) -> ChunkStore {
    let mut store = ChunkStore::new(dims);
    let origins = [
        ChunkOrigin::new(3, 0, 0),
        ChunkOrigin::new(0, 0, 0),
        ChunkOrigin::new(0, 2, -3),
    ];
    for (k, &o) in origins.iter().enumerate() {
        let voxels = (0..dims.volume())
            .map(|i| VoxelType::ALL[(i + k * 5) % VoxelType::COUNT])
            .collect();
        let mut c = Chunk::from_voxels(o, dims, voxels);
        c.set_damage(0, VoxelType::Damage2);
        store.insert(ChunkEntry::new(c, k != 1));
        store.add_column(o.column());
    }
    store
}

#[test]
fn round_trip_reproduces_grids_visibility_and_observer() {
    let cfg = config();
    let dir = tempfile::tempdir().unwrap();
    let store = sample_store(cfg.chunk);
    let observer = Vec3::new(4.5, 17.25, -2.0);
    let data = WorldData::capture(&store, observer);
    let path = save_world(dir.path(), &cfg, &data).unwrap();
    assert_eq!(path, save_path(dir.path(), &cfg));
    assert!(!path.with_extension("tmp").exists());

    let loaded = load_world(dir.path(), &cfg).unwrap().unwrap();
    assert_eq!(loaded, data);
    let world = loaded.restore(&cfg).unwrap();
    assert_eq!(world.observer, observer);
    assert_eq!(
        world.columns,
        vec![ColumnKey::new(3, 0), ColumnKey::new(0, 0), ColumnKey::new(0, -3)]
    );
    for (restored, entry) in world.chunks.iter().zip(store.entries()) {
        assert_eq!(restored.origin, entry.origin());
        assert_eq!(restored.voxels, entry.chunk.voxels());
        assert_eq!(restored.visible, entry.visible);
        // damage is not persisted
        let rebuilt = Chunk::from_voxels(restored.origin, cfg.chunk, restored.voxels.clone());
        assert_eq!(rebuilt.damage(0), UNDAMAGED);
    }
}

#[test]
fn missing_save_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_world(dir.path(), &config()).unwrap().is_none());
}

#[test]
fn save_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("savedata");
    let cfg = config();
    let data = WorldData::capture(&sample_store(cfg.chunk), Vec3::ZERO);
    save_world(&nested, &cfg, &data).unwrap();
    assert!(save_path(&nested, &cfg).is_file());
}

#[test]
fn corrupt_file_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config();
    std::fs::write(save_path(dir.path(), &cfg), b"{ not json").unwrap();
    assert!(matches!(load_world(dir.path(), &cfg), Err(PersistError::Json(_))));
}

#[test]
fn save_from_other_dims_does_not_restore() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config();
    let data = WorldData::capture(&sample_store(cfg.chunk), Vec3::ZERO);
    save_world(dir.path(), &cfg, &data).unwrap();
    let loaded = load_world(dir.path(), &cfg).unwrap().unwrap();
    let mut other = config();
    other.chunk = ChunkDims::new(2, 2, 2);
    assert!(matches!(
        loaded.restore(&other),
        Err(PersistError::Mismatch(_))
    ));
}

#[test]
fn save_taller_than_world_does_not_restore() {
    let mut cfg = config();
    let data = WorldData::capture(&sample_store(cfg.chunk), Vec3::ZERO);
    // the store's highest chunk sits in slot 1
    cfg.world.y = 1;
    assert!(matches!(data.restore(&cfg), Err(PersistError::Mismatch(_))));
    cfg.world.y = 2;
    assert!(data.restore(&cfg).is_ok());
}
