use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strata_chunk::Chunk;
use strata_edit::MutationEngine;
use strata_geom::Vec3;
use strata_io::{PersistError, WorldData, load_world, save_world};
use strata_mesh_cpu::ChunkSurfaces;
use strata_runtime::{
    BuildJob, ChunkEntry, ChunkStore, StreamSettings, StreamingCoordinator, ThreadPoolBuildError,
    WorkerPool,
};
use strata_world::{ChunkOrigin, ConfigError, VoxelGenerator, WorldConfig};
use thiserror::Error;

use crate::command::Command;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// How the world came to exist at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldSource {
    Generated,
    Loaded,
}

/// Owns one world session: configuration, chunks, both schedulers and the
/// observer. An external loop drives it one tick at a time with
/// [`App::step`].
pub struct App {
    cfg: WorldConfig,
    pool: WorkerPool,
    store: ChunkStore,
    streaming: StreamingCoordinator,
    edits: MutationEngine,
    observer: Vec3,
    inbox: Receiver<Command>,
    outbox: Sender<Command>,
    save_dir: PathBuf,
    tick: u64,
}

impl App {
    /// Validates `cfg` and sets up an empty world. Call [`App::build_world`]
    /// or [`App::load_or_build`] before stepping.
    pub fn new(cfg: WorldConfig, save_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        cfg.validate()?;
        let pool = WorkerPool::new(cfg.workers)?;
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let streaming = StreamingCoordinator::new(
            StreamSettings::from_config(&cfg),
            VoxelGenerator::new(&cfg),
            rng,
        );
        let (outbox, inbox) = unbounded();
        Ok(Self {
            store: ChunkStore::new(cfg.chunk),
            edits: MutationEngine::new(&cfg),
            streaming,
            pool,
            observer: Vec3::ZERO,
            inbox,
            outbox,
            save_dir: save_dir.into(),
            tick: 0,
            cfg,
        })
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    #[inline]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    #[inline]
    pub fn streaming(&self) -> &StreamingCoordinator {
        &self.streaming
    }

    #[inline]
    pub fn edits(&self) -> &MutationEngine {
        &self.edits
    }

    #[inline]
    pub fn observer(&self) -> Vec3 {
        self.observer
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sender for collaborators; commands are applied at the start of the
    /// next tick.
    pub fn commands(&self) -> Sender<Command> {
        self.outbox.clone()
    }

    /// Builds the core world synchronously, places the observer at the spawn
    /// point and queues the hidden prewarm band.
    pub fn build_world(&mut self) {
        let t0 = Instant::now();
        self.streaming.submit(BuildJob::BuildCore);
        self.streaming.drain(&mut self.store, &self.pool);
        self.observer = self.streaming.spawn_position();
        self.streaming.set_last_build(self.observer);
        self.streaming.submit(BuildJob::BuildExtra);
        log::info!(
            target: "perf",
            "ms={} build_core chunks={} spawn=({:.1}, {:.1}, {:.1})",
            t0.elapsed().as_millis(),
            self.store.len(),
            self.observer.x,
            self.observer.y,
            self.observer.z
        );
    }

    /// Restores the save for this world shape if there is a usable one,
    /// otherwise generates.
    pub fn load_or_build(&mut self) -> WorldSource {
        match self.try_load() {
            Ok(true) => return WorldSource::Loaded,
            Ok(false) => {}
            Err(e) => log::warn!(target: "io", "save unusable, regenerating: {e}"),
        }
        self.build_world();
        WorldSource::Generated
    }

    fn try_load(&mut self) -> Result<bool, PersistError> {
        let Some(data) = load_world(&self.save_dir, &self.cfg)? else {
            return Ok(false);
        };
        let world = data.restore(&self.cfg)?;
        let t0 = Instant::now();
        let dims = self.cfg.chunk;
        let mut store = ChunkStore::new(dims);
        for rc in world.chunks {
            let entry = self.pool.install(|| {
                let chunk = Chunk::from_voxels(rc.origin, dims, rc.voxels);
                ChunkEntry::new(chunk, rc.visible)
            });
            store.insert(entry);
        }
        for col in world.columns {
            store.add_column(col);
        }
        self.store = store;
        self.observer = world.observer;
        self.streaming.set_last_build(world.observer);
        log::info!(
            target: "perf",
            "ms={} restore chunks={} columns={}",
            t0.elapsed().as_millis(),
            self.store.len(),
            self.store.columns().len()
        );
        Ok(true)
    }

    pub fn save(&self) -> Result<PathBuf, PersistError> {
        let data = WorldData::capture(&self.store, self.observer);
        save_world(&self.save_dir, &self.cfg, &data)
    }

    /// Surfaces of every visible chunk, in creation order.
    pub fn visible_surfaces(&self) -> impl Iterator<Item = (ChunkOrigin, &ChunkSurfaces)> + '_ {
        self.store
            .visible_entries()
            .map(|e| (e.origin(), &e.surfaces))
    }

    /// One tick: queued commands, due mutation tasks, then streaming.
    pub fn step(&mut self) {
        log::trace!(target: "events", "[tick {}] Tick", self.tick);
        while let Ok(cmd) = self.inbox.try_recv() {
            self.apply(cmd);
        }
        let ran = self.edits.run_ready(&mut self.store);
        if ran > 0 {
            log::debug!(target: "events", "[tick {}] EditTasksRan count={}", self.tick, ran);
        }
        self.edits.advance_tick();
        self.streaming
            .tick(&mut self.store, &self.pool, self.observer);
        self.tick += 1;
    }

    /// Runs `n` ticks.
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    fn apply(&mut self, cmd: Command) {
        let tick = self.tick;
        match cmd {
            Command::Damage { pos } => {
                log::info!(target: "events", "[tick {}] DamageRequested ({}, {}, {})", tick, pos.x, pos.y, pos.z);
                if let Err(e) = self.edits.damage_at(&mut self.store, pos) {
                    log::warn!(target: "edit", "damage ignored: {e}");
                }
            }
            Command::Place { pos, voxel } => {
                log::info!(target: "events", "[tick {}] PlaceRequested ({}, {}, {}) voxel={:?}", tick, pos.x, pos.y, pos.z, voxel);
                if let Err(e) = self.edits.place_at(&mut self.store, pos, voxel) {
                    log::warn!(target: "edit", "place ignored: {e}");
                }
            }
            Command::SelectPlaceType(v) => {
                if let Err(e) = self.edits.set_place_type(v) {
                    log::warn!(target: "edit", "{e}");
                }
            }
            Command::MoveObserver(p) => {
                log::trace!(target: "events", "[tick {}] ObserverMoveRequested ({:.2}, {:.2}, {:.2})", tick, p.x, p.y, p.z);
                self.observer = p;
            }
            Command::Save => {
                if let Err(e) = self.save() {
                    log::error!(target: "io", "save failed: {e}");
                }
            }
        }
    }
}
