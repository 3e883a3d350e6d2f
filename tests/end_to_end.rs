use strata::{App, Command, WorldSource};
use strata_blocks::VoxelType;
use strata_geom::{IVec3, Vec3};
use strata_io::{WorldData, save_world};
use strata_world::{ChunkDims, Extent, NoiseLayer, WorldConfig};

/// 2x1x2 chunks of 4^3 over flat terrain: bedrock, dirt, grass, then air.
fn flat_world() -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.seed = Some(1);
    cfg.workers = 2;
    cfg.water_level = 0;
    cfg.chunk = ChunkDims::new(4, 4, 4);
    cfg.world = Extent { x: 2, y: 1, z: 2 };
    cfg.extra = Extent { x: 0, y: 0, z: 0 };
    cfg.layers.surface = NoiseLayer::new(1, 0.5, 0.0, 2.0, 0.0);
    cfg.layers.stone = cfg.layers.stone.disabled();
    cfg.layers.ore_high = cfg.layers.ore_high.disabled();
    cfg.layers.cave = cfg.layers.cave.disabled();
    cfg.layers.tree = cfg.layers.tree.disabled();
    cfg
}

fn voxel_at(app: &App, p: IVec3) -> VoxelType {
    let (origin, i) = app.store().locate(p).expect("voxel is loaded");
    app.store().get(origin).expect("chunk exists").chunk.voxel(i)
}

#[test]
fn flat_world_builds_expected_columns_and_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(flat_world(), dir.path()).unwrap();
    app.build_world();

    assert_eq!(app.store().len(), 4);
    assert_eq!(app.store().columns().len(), 4);
    for x in 0..8 {
        for z in 0..8 {
            let column: Vec<_> = (0..4).map(|y| voxel_at(&app, IVec3::new(x, y, z))).collect();
            assert_eq!(
                column,
                vec![
                    VoxelType::Bedrock,
                    VoxelType::Dirt,
                    VoxelType::GrassSide,
                    VoxelType::Air
                ],
                "column ({x}, {z})"
            );
        }
    }

    // Exactly one upward solid face per (x, z): the grass top.
    let mut up = 0;
    let mut fluid = 0;
    for (_, s) in app.visible_surfaces() {
        for quad in s.solid.indices.chunks_exact(6) {
            if s.solid.normals[quad[0] as usize] == [0.0, 1.0, 0.0] {
                up += 1;
            }
        }
        fluid += s.fluid.indices.len();
    }
    assert_eq!(up, 64);
    assert_eq!(fluid, 0);
    assert!(app.observer().y > 2.0);
}

#[test]
fn commands_break_a_block_and_sand_falls_into_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(flat_world(), dir.path()).unwrap();
    app.build_world();

    let tx = app.commands();
    tx.send(Command::Place {
        pos: IVec3::new(1, 3, 1),
        voxel: Some(VoxelType::Sand),
    })
    .unwrap();
    app.step();
    assert_eq!(voxel_at(&app, IVec3::new(1, 3, 1)), VoxelType::Sand);

    // Grass has durability 2.
    tx.send(Command::Damage { pos: IVec3::new(1, 2, 1) }).unwrap();
    tx.send(Command::Damage { pos: IVec3::new(1, 2, 1) }).unwrap();
    app.run_ticks(6);

    assert_eq!(voxel_at(&app, IVec3::new(1, 2, 1)), VoxelType::Sand);
    assert_eq!(voxel_at(&app, IVec3::new(1, 3, 1)), VoxelType::Air);
    assert_eq!(voxel_at(&app, IVec3::new(1, 1, 1)), VoxelType::Dirt);
    assert!(app.edits().stats().broken >= 1);
}

#[test]
fn bedrock_ignores_damage_and_air_is_not_placeable() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(flat_world(), dir.path()).unwrap();
    app.build_world();

    let tx = app.commands();
    for _ in 0..5 {
        tx.send(Command::Damage { pos: IVec3::new(2, 0, 2) }).unwrap();
    }
    tx.send(Command::Place {
        pos: IVec3::new(2, 3, 2),
        voxel: Some(VoxelType::Air),
    })
    .unwrap();
    tx.send(Command::Damage { pos: IVec3::new(50, 1, 50) }).unwrap();
    app.run_ticks(3);

    assert_eq!(voxel_at(&app, IVec3::new(2, 0, 2)), VoxelType::Bedrock);
    assert_eq!(voxel_at(&app, IVec3::new(2, 3, 2)), VoxelType::Air);
}

#[test]
fn saved_world_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(flat_world(), dir.path()).unwrap();
    assert_eq!(app.load_or_build(), WorldSource::Generated);

    let tx = app.commands();
    tx.send(Command::Place {
        pos: IVec3::new(6, 3, 5),
        voxel: Some(VoxelType::Stone),
    })
    .unwrap();
    tx.send(Command::Save).unwrap();
    app.step();

    let mut again = App::new(flat_world(), dir.path()).unwrap();
    assert_eq!(again.load_or_build(), WorldSource::Loaded);
    assert_eq!(again.store().len(), app.store().len());
    assert_eq!(again.store().origins(), app.store().origins());
    assert_eq!(again.store().columns(), app.store().columns());
    assert_eq!(again.observer(), app.observer());
    assert_eq!(voxel_at(&again, IVec3::new(6, 3, 5)), VoxelType::Stone);
    for (a, b) in again.store().entries().zip(app.store().entries()) {
        assert_eq!(a.chunk.voxels(), b.chunk.voxels());
        assert_eq!(a.visible, b.visible);
        assert_eq!(a.surfaces.quad_count(), b.surfaces.quad_count());
    }
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = flat_world();
    cfg.chunk = ChunkDims::new(0, 4, 4);
    assert!(App::new(cfg, "unused").is_err());
}

#[test]
fn save_outside_world_height_regenerates() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = flat_world();
    let bogus = WorldData {
        chunk_origins: vec![0, 100, 0],
        columns: vec![400, 400],
        voxels: vec![VoxelType::Stone.code(); cfg.chunk.volume()],
        visibility: vec![true],
        observer: [1.0, 2.0, 3.0],
    };
    save_world(dir.path(), &cfg, &bogus).unwrap();

    let mut app = App::new(cfg, dir.path()).unwrap();
    assert_eq!(app.load_or_build(), WorldSource::Generated);
    assert_eq!(app.store().len(), 4);
    assert!(app.store().entries().all(|e| e.origin().y == 0));
    assert_ne!(app.observer(), Vec3::new(1.0, 2.0, 3.0));
}
