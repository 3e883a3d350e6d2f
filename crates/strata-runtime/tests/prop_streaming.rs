use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strata_geom::Vec3;
use strata_runtime::{BuildJob, ChunkStore, StreamSettings, StreamingCoordinator, WorkerPool};
use strata_world::{ChunkDims, ColumnKey, Extent, NoiseLayer, VoxelGenerator, WorldConfig};

fn config(radius: i32) -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.chunk = ChunkDims::new(2, 2, 2);
    cfg.world = Extent { x: 2, y: 2, z: 2 };
    cfg.extra = Extent { x: 0, y: 0, z: 0 };
    cfg.draw_radius = radius;
    cfg.timing.update_interval_ms = cfg.timing.tick_ms;
    cfg.layers.surface = NoiseLayer::new(1, 0.1, 0.0, 2.0, 0.0);
    cfg
}

fn observer() -> impl Strategy<Value = Vec3> {
    (-40.0f32..40.0, 0.0f32..10.0, -40.0f32..40.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // after the queue drains: every lattice neighbour within the radius exists,
    // and visibility matches the sweep distance exactly
    #[test]
    fn columns_near_observer_exist_and_visibility_matches_distance(
        obs in observer(),
        radius in 1i32..=3,
    ) {
        let cfg = config(radius);
        let pool = WorkerPool::new(2).unwrap();
        let mut store = ChunkStore::new(cfg.chunk);
        let mut sc = StreamingCoordinator::new(
            StreamSettings::from_config(&cfg),
            VoxelGenerator::new(&cfg),
            StdRng::seed_from_u64(9),
        );
        sc.submit(BuildJob::BuildCore);
        sc.drain(&mut store, &pool);
        sc.set_last_build(Vec3::new(1000.0, 0.0, 1000.0));
        let mut ticks = 0;
        while ticks == 0 || !sc.is_idle() {
            sc.tick(&mut store, &pool, obs);
            ticks += 1;
            prop_assert!(ticks < 10_000);
        }

        let centre = sc.column_under(obs);
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let steps = dx.abs() + dz.abs();
                if steps == 0 || steps > radius {
                    continue;
                }
                let col = ColumnKey::new(centre.x + dx * 2, centre.z + dz * 2);
                prop_assert!(store.has_column(col), "missing {:?}", col);
                for slot in 0..cfg.world.y {
                    prop_assert!(store.contains(col.origin_at(slot, cfg.chunk)));
                }
            }
        }
        let limit = i64::from(radius * 2) * i64::from(radius * 2);
        for &col in store.columns() {
            let want = col.distance_sq(centre) < limit;
            for slot in 0..cfg.world.y {
                let e = store.get(col.origin_at(slot, cfg.chunk)).unwrap();
                prop_assert_eq!(e.visible, want);
            }
        }
        // nothing is ever dropped
        prop_assert_eq!(store.len(), store.columns().len() * cfg.world.y as usize);
    }
}

#[test]
fn hidden_chunks_keep_their_surfaces() {
    let cfg = config(1);
    let pool = WorkerPool::new(1).unwrap();
    let mut store = ChunkStore::new(cfg.chunk);
    let mut sc = StreamingCoordinator::new(
        StreamSettings::from_config(&cfg),
        VoxelGenerator::new(&cfg),
        StdRng::seed_from_u64(1),
    );
    sc.submit(BuildJob::BuildCore);
    sc.drain(&mut store, &pool);
    let before: Vec<usize> = store.entries().map(|e| e.surfaces.quad_count()).collect();
    sc.submit(BuildJob::Sweep { x: 500, z: 500 });
    sc.drain(&mut store, &pool);
    assert_eq!(store.visible_entries().count(), 0);
    let after: Vec<usize> = store.entries().map(|e| e.surfaces.quad_count()).collect();
    assert_eq!(before, after);
    assert!(after.iter().any(|&q| q > 0));
}
