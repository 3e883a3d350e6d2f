use std::collections::VecDeque;
use std::ops::Range;
use std::time::Instant;

use rand::rngs::StdRng;
use strata_chunk::generate_chunk;
use strata_geom::{IVec3, Vec3};
use strata_world::{ChunkDims, ColumnKey, Extent, VoxelGenerator, WorldConfig};

use crate::pool::WorkerPool;
use crate::store::{ChunkEntry, ChunkStore};

/// Work items accepted by the streaming coordinator. Coordinates are world
/// voxel units on the chunk lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildJob {
    /// Create any missing chunks of one column and set their visibility.
    BuildColumn { col: ColumnKey, visible: bool },
    /// Every column of the core world, visible.
    BuildCore,
    /// The prewarm band beyond the core, hidden.
    BuildExtra,
    /// Build the four lateral neighbours of `(x, z)` and recurse outwards.
    Expand { x: i32, z: i32, radius: i32 },
    /// Show columns inside the draw radius around `(x, z)`, hide the rest.
    Sweep { x: i32, z: i32 },
}

// One unit of work between yields.
#[derive(Clone, Copy, Debug)]
enum Step {
    Column { col: ColumnKey, visible: bool },
    Neighbour { col: ColumnKey, radius: i32 },
    Sweep { centre: ColumnKey },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StreamStats {
    pub steps: u64,
    pub columns_built: u64,
    pub chunks_created: u64,
}

/// Streaming settings derived from [`WorldConfig`].
#[derive(Clone, Copy, Debug)]
pub struct StreamSettings {
    pub dims: ChunkDims,
    pub world: Extent,
    pub extra: Extent,
    pub draw_radius: i32,
    pub update_interval_ticks: u64,
    pub steps_per_tick: usize,
}

impl StreamSettings {
    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self {
            dims: cfg.chunk,
            world: cfg.world,
            extra: cfg.extra,
            draw_radius: cfg.draw_radius,
            update_interval_ticks: cfg.ticks_for(cfg.timing.update_interval_ms),
            steps_per_tick: cfg.timing.steps_per_tick,
        }
    }
}

/// Cooperative scheduler that creates chunks around the observer and toggles
/// their visibility. Top-level jobs run in submission order; sub-jobs a job
/// enqueues run breadth-first before the next top-level job starts.
pub struct StreamingCoordinator {
    settings: StreamSettings,
    generator: VoxelGenerator,
    rng: StdRng,
    top: VecDeque<BuildJob>,
    sub: VecDeque<BuildJob>,
    active: VecDeque<Step>,
    last_build: IVec3,
    tick: u64,
    stats: StreamStats,
}

impl StreamingCoordinator {
    pub fn new(settings: StreamSettings, generator: VoxelGenerator, rng: StdRng) -> Self {
        Self {
            settings,
            generator,
            rng,
            top: VecDeque::new(),
            sub: VecDeque::new(),
            active: VecDeque::new(),
            last_build: IVec3::ZERO,
            tick: 0,
            stats: StreamStats::default(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    #[inline]
    pub fn generator(&self) -> &VoxelGenerator {
        &self.generator
    }

    #[inline]
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    #[inline]
    pub fn last_build(&self) -> IVec3 {
        self.last_build
    }

    /// Records `pos` (rounded up) as the place the world was last built
    /// around.
    pub fn set_last_build(&mut self, pos: Vec3) {
        self.last_build = IVec3::ceil(pos);
    }

    pub fn submit(&mut self, job: BuildJob) {
        log::debug!(target: "events", "[tick {}] BuildJobSubmitted {:?}", self.tick, job);
        self.top.push_back(job);
    }

    /// True when no job or step is waiting.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.sub.is_empty() && self.top.is_empty()
    }

    /// Jobs not yet started, top-level and sub-jobs together.
    pub fn pending_jobs(&self) -> usize {
        self.top.len() + self.sub.len()
    }

    /// Starting observer position: above the terrain at the core's middle.
    pub fn spawn_position(&self) -> Vec3 {
        let d = self.settings.dims.as_ivec3();
        let x = self.settings.world.x / 2 * d.x;
        let z = self.settings.world.z / 2 * d.z;
        let y = self.generator.surface_height(x, z) + 10;
        IVec3::new(x, y, z).as_vec3()
    }

    /// Column under `observer`, truncated toward zero onto the chunk lattice.
    pub fn column_under(&self, observer: Vec3) -> ColumnKey {
        let d = self.settings.dims.as_ivec3();
        ColumnKey::new(
            (observer.x / d.x as f32) as i32 * d.x,
            (observer.z / d.z as f32) as i32 * d.z,
        )
    }

    /// Queues an expansion and sweep around `observer` if it moved more than
    /// one chunk width since the last build.
    pub fn observe(&mut self, observer: Vec3) -> bool {
        let sx = self.settings.dims.sx as f32;
        if (self.last_build.as_vec3() - observer).length_squared() <= sx * sx {
            return false;
        }
        self.last_build = IVec3::ceil(observer);
        let col = self.column_under(observer);
        log::info!(
            target: "events",
            "[tick {}] ObserverMoved build_pos=({}, {}, {}) column=({}, {})",
            self.tick,
            self.last_build.x,
            self.last_build.y,
            self.last_build.z,
            col.x,
            col.z
        );
        self.submit(BuildJob::Expand {
            x: col.x,
            z: col.z,
            radius: self.settings.draw_radius,
        });
        self.submit(BuildJob::Sweep { x: col.x, z: col.z });
        true
    }

    /// One scheduler tick: the periodic observer check, then at most
    /// `steps_per_tick` steps. Returns the number of steps run.
    pub fn tick(&mut self, store: &mut ChunkStore, pool: &WorkerPool, observer: Vec3) -> usize {
        if self.tick % self.settings.update_interval_ticks.max(1) == 0 {
            self.observe(observer);
        }
        let mut ran = 0;
        while ran < self.settings.steps_per_tick && self.run_step(store, pool) {
            ran += 1;
        }
        self.tick += 1;
        ran
    }

    /// Runs steps until every queued job has finished.
    pub fn drain(&mut self, store: &mut ChunkStore, pool: &WorkerPool) -> u64 {
        let mut ran = 0;
        while self.run_step(store, pool) {
            ran += 1;
        }
        ran
    }

    /// Executes the next step, starting the next job if the current one is
    /// exhausted. Returns false when there is nothing left to do.
    pub fn run_step(&mut self, store: &mut ChunkStore, pool: &WorkerPool) -> bool {
        loop {
            if let Some(step) = self.active.pop_front() {
                self.execute(step, store, pool);
                self.stats.steps += 1;
                return true;
            }
            let Some(job) = self.sub.pop_front().or_else(|| self.top.pop_front()) else {
                return false;
            };
            self.active = self.plan(job);
        }
    }

    fn plan(&self, job: BuildJob) -> VecDeque<Step> {
        let d = self.settings.dims.as_ivec3();
        let (w, e) = (self.settings.world, self.settings.extra);
        let mut steps = VecDeque::new();
        match job {
            BuildJob::BuildColumn { col, visible } => {
                steps.push_back(Step::Column { col, visible });
            }
            BuildJob::BuildCore => push_rect(&mut steps, d, 0..w.x, 0..w.z, true),
            BuildJob::BuildExtra => {
                push_rect(&mut steps, d, 0..w.x + e.x, w.z..w.z + e.z, false);
                push_rect(&mut steps, d, w.x..w.x + e.x, 0..w.z + e.z, false);
            }
            BuildJob::Expand { x, z, radius } => {
                if radius > 0 {
                    for (dx, dz) in [(0, d.z), (0, -d.z), (d.x, 0), (-d.x, 0)] {
                        let col = ColumnKey::new(x + dx, z + dz);
                        steps.push_back(Step::Neighbour { col, radius });
                    }
                }
            }
            BuildJob::Sweep { x, z } => {
                steps.push_back(Step::Sweep {
                    centre: ColumnKey::new(x, z),
                });
            }
        }
        steps
    }

    fn execute(&mut self, step: Step, store: &mut ChunkStore, pool: &WorkerPool) {
        match step {
            Step::Column { col, visible } => self.build_column(store, pool, col, visible),
            Step::Neighbour { col, radius } => {
                self.build_column(store, pool, col, true);
                self.sub.push_back(BuildJob::Expand {
                    x: col.x,
                    z: col.z,
                    radius: radius - 1,
                });
            }
            Step::Sweep { centre } => self.sweep(store, centre),
        }
    }

    fn build_column(&mut self, store: &mut ChunkStore, pool: &WorkerPool, col: ColumnKey, visible: bool) {
        let dims = self.settings.dims;
        let t0 = Instant::now();
        let mut created = 0u32;
        for slot in 0..self.settings.world.y {
            let origin = col.origin_at(slot, dims);
            if !store.contains(origin) {
                let generator = &self.generator;
                let rng = &mut self.rng;
                let entry = pool.install(|| {
                    let chunk = generate_chunk(generator, origin, dims, rng);
                    ChunkEntry::new(chunk, visible)
                });
                store.insert(entry);
                created += 1;
            }
            store.set_visible(origin, visible);
        }
        store.add_column(col);
        self.stats.columns_built += 1;
        self.stats.chunks_created += u64::from(created);
        if created > 0 {
            log::debug!(
                target: "perf",
                "ms={} build_column ({}, {}) chunks={}",
                t0.elapsed().as_millis(),
                col.x,
                col.z,
                created
            );
        }
        log::trace!(
            target: "events",
            "[tick {}] BuildColumn ({}, {}) visible={} created={}",
            self.tick,
            col.x,
            col.z,
            visible,
            created
        );
    }

    fn sweep(&mut self, store: &mut ChunkStore, centre: ColumnKey) {
        let reach = i64::from(self.settings.draw_radius) * self.settings.dims.sx as i64;
        let limit = reach * reach;
        let columns = store.columns().to_vec();
        let mut hidden = 0usize;
        for col in columns {
            let visible = col.distance_sq(centre) < limit;
            if !visible {
                hidden += 1;
            }
            store.set_column_visible(col, visible, self.settings.world.y);
        }
        log::debug!(
            target: "events",
            "[tick {}] Sweep ({}, {}) hidden_columns={}",
            self.tick,
            centre.x,
            centre.z,
            hidden
        );
    }
}

// Columns of a rectangle given in chunk units, z rows outermost.
fn push_rect(steps: &mut VecDeque<Step>, d: IVec3, xs: Range<i32>, zs: Range<i32>, visible: bool) {
    for z in zs {
        for x in xs.clone() {
            let col = ColumnKey::new(x * d.x, z * d.z);
            steps.push_back(Step::Column { col, visible });
        }
    }
}
