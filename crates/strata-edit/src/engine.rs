use strata_blocks::{UNDAMAGED, VoxelType};
use strata_geom::IVec3;
use strata_runtime::{ChunkStore, TaskQueue};
use strata_world::{ChunkOrigin, WorldConfig};

use crate::EditError;
use crate::neighbor::resolve_neighbor;

/// Deferred work scheduled by mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditTask {
    /// Clear cracks on a voxel that survived.
    Heal { origin: ChunkOrigin, index: usize },
    /// Let a loose voxel fall, or spread if it is liquid and blocked.
    Drop {
        origin: ChunkOrigin,
        index: usize,
        strength: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The voxel cannot be broken.
    Ignored,
    /// Damage advanced to this marker.
    Cracked(VoxelType),
    /// The voxel was destroyed and is now air.
    Broken(VoxelType),
}

#[derive(Default, Debug, Clone, Copy)]
pub struct EditStats {
    pub hits: u64,
    pub broken: u64,
    pub placed: u64,
    pub healed: u64,
    pub falls: u64,
    pub flows: u64,
    /// Chunk surface rebuilds requested by mutations.
    pub rebuilds: u64,
}

// Lateral flow order; each later direction starts one strength lower.
const FLOW_DIRS: [IVec3; 4] = [IVec3::RIGHT, IVec3::LEFT, IVec3::FORWARD, IVec3::BACK];

/// Applies player mutations to chunks in a [`ChunkStore`] and runs the
/// timed cascades they trigger. Every grid change rebuilds the surfaces of
/// the chunks it touched before returning.
pub struct MutationEngine {
    tasks: TaskQueue<EditTask>,
    place_type: VoxelType,
    drop_strength: i32,
    drop_delay: u64,
    heal_delay: u64,
    stats: EditStats,
}

impl MutationEngine {
    pub fn new(cfg: &WorldConfig) -> Self {
        Self {
            tasks: TaskQueue::new(),
            place_type: cfg.place_type,
            drop_strength: cfg.drop_strength,
            drop_delay: cfg.ticks_for(cfg.timing.drop_delay_ms),
            heal_delay: cfg.ticks_for(cfg.timing.heal_delay_ms),
            stats: EditStats::default(),
        }
    }

    #[inline]
    pub fn place_type(&self) -> VoxelType {
        self.place_type
    }

    #[inline]
    pub fn stats(&self) -> EditStats {
        self.stats
    }

    /// Scheduled tasks not yet run.
    #[inline]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.tasks.now()
    }

    pub fn set_place_type(&mut self, v: VoxelType) -> Result<(), EditError> {
        if v.is_air() || v.is_damage_marker() {
            return Err(EditError::NotPlaceable(v));
        }
        self.place_type = v;
        log::info!(target: "edit", "place type set to {:?}", v);
        Ok(())
    }

    fn check_index(store: &ChunkStore, origin: ChunkOrigin, index: usize) -> Result<(), EditError> {
        let entry = store.get(origin).ok_or(EditError::UnknownChunk(origin))?;
        let len = entry.chunk.len();
        debug_assert!(index < len, "voxel index {index} out of range for {len}");
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// One hit on a voxel. Breaking it schedules a drop check above.
    pub fn damage(
        &mut self,
        store: &mut ChunkStore,
        origin: ChunkOrigin,
        index: usize,
    ) -> Result<DamageOutcome, EditError> {
        Self::check_index(store, origin, index)?;
        let Some(entry) = store.get_mut(origin) else {
            return Err(EditError::UnknownChunk(origin));
        };
        let chunk = &mut entry.chunk;
        let v = chunk.voxel(index);
        if v.is_indestructible() {
            return Ok(DamageOutcome::Ignored);
        }
        self.stats.hits += 1;
        let current = chunk.damage(index);
        if current == UNDAMAGED {
            self.tasks
                .emit_after(self.heal_delay, EditTask::Heal { origin, index });
        }
        let level = current.damage_level().unwrap_or(0) + 1;
        let outcome = if i32::from(level) >= v.durability() {
            chunk.replace(index, VoxelType::Air);
            self.stats.broken += 1;
            DamageOutcome::Broken(v)
        } else {
            let marker = VoxelType::damage_marker(level).unwrap_or(UNDAMAGED);
            chunk.set_damage(index, marker);
            DamageOutcome::Cracked(marker)
        };
        let local = chunk.local(index);
        entry.rebuild();
        self.stats.rebuilds += 1;
        log::debug!(target: "edit", "damage ({}, {}, {})#{} {:?} -> {:?}", origin.x, origin.y, origin.z, index, v, outcome);

        if let DamageOutcome::Broken(_) = outcome {
            if let Some((o, i)) = resolve_neighbor(store, origin, local + IVec3::UP) {
                self.schedule_drop(store, o, i, self.drop_strength);
            }
        }
        Ok(outcome)
    }

    /// Writes `v` with no damage, rebuilds and lets it fall if loose.
    pub fn place(
        &mut self,
        store: &mut ChunkStore,
        origin: ChunkOrigin,
        index: usize,
        v: VoxelType,
    ) -> Result<(), EditError> {
        if v.is_air() || v.is_damage_marker() {
            return Err(EditError::NotPlaceable(v));
        }
        Self::check_index(store, origin, index)?;
        let Some(entry) = store.get_mut(origin) else {
            return Err(EditError::UnknownChunk(origin));
        };
        entry.chunk.replace(index, v);
        entry.rebuild();
        self.stats.rebuilds += 1;
        self.stats.placed += 1;
        log::debug!(target: "edit", "place ({}, {}, {})#{} {:?}", origin.x, origin.y, origin.z, index, v);
        self.schedule_drop(store, origin, index, self.drop_strength);
        Ok(())
    }

    pub fn place_selected(
        &mut self,
        store: &mut ChunkStore,
        origin: ChunkOrigin,
        index: usize,
    ) -> Result<(), EditError> {
        self.place(store, origin, index, self.place_type)
    }

    /// [`MutationEngine::damage`] addressed by world voxel.
    pub fn damage_at(&mut self, store: &mut ChunkStore, pos: IVec3) -> Result<DamageOutcome, EditError> {
        let (origin, index) = store.locate(pos).ok_or(EditError::Unresolved(pos))?;
        self.damage(store, origin, index)
    }

    /// [`MutationEngine::place`] addressed by world voxel; `None` places the
    /// selected type.
    pub fn place_at(
        &mut self,
        store: &mut ChunkStore,
        pos: IVec3,
        v: Option<VoxelType>,
    ) -> Result<(), EditError> {
        let (origin, index) = store.locate(pos).ok_or(EditError::Unresolved(pos))?;
        self.place(store, origin, index, v.unwrap_or(self.place_type))
    }

    /// Queues a drop check after the drop delay, if the voxel can fall at all.
    fn schedule_drop(&mut self, store: &ChunkStore, origin: ChunkOrigin, index: usize, strength: i32) {
        let loose = store
            .get(origin)
            .is_some_and(|e| e.chunk.voxel(index).can_drop());
        if loose {
            self.tasks.emit_after(
                self.drop_delay,
                EditTask::Drop {
                    origin,
                    index,
                    strength,
                },
            );
        }
    }

    /// Runs every task due this tick, in schedule order. Returns how many ran.
    pub fn run_ready(&mut self, store: &mut ChunkStore) -> usize {
        let mut ran = 0;
        while let Some(env) = self.tasks.pop_ready() {
            log::trace!(target: "events", "[tick {}] EditTask#{} {:?}", self.tasks.now(), env.id, env.task);
            match env.task {
                EditTask::Heal { origin, index } => self.heal(store, origin, index),
                EditTask::Drop {
                    origin,
                    index,
                    strength,
                } => self.drop_step(store, origin, index, strength),
            }
            ran += 1;
        }
        ran
    }

    pub fn advance_tick(&mut self) {
        self.tasks.advance_tick();
    }

    fn heal(&mut self, store: &mut ChunkStore, origin: ChunkOrigin, index: usize) {
        let Some(entry) = store.get_mut(origin) else {
            return;
        };
        if entry.chunk.voxel(index).is_air() {
            return;
        }
        entry.chunk.set_damage(index, UNDAMAGED);
        entry.rebuild();
        self.stats.rebuilds += 1;
        self.stats.healed += 1;
    }

    // One fall of a loose voxel. Falling again is scheduled rather than
    // looped so each cell waits out the drop delay.
    fn drop_step(&mut self, store: &mut ChunkStore, origin: ChunkOrigin, index: usize, strength: i32) {
        let Some(entry) = store.get(origin) else {
            return;
        };
        let v = entry.chunk.voxel(index);
        if !v.can_drop() {
            return;
        }
        let local = entry.chunk.local(index);
        // nothing loaded below: this branch of the cascade ends here
        let Some((bo, bi)) = resolve_neighbor(store, origin, local + IVec3::DOWN) else {
            return;
        };
        let below_is_air = store
            .get(bo)
            .is_some_and(|e| e.chunk.voxel(bi).is_air());

        if below_is_air {
            if let Some(e) = store.get_mut(bo) {
                e.chunk.replace(bi, v);
            }
            if let Some(e) = store.get_mut(origin) {
                e.chunk.replace(index, VoxelType::Air);
            }
            self.stats.falls += 1;
            if let Some((ao, ai)) = resolve_neighbor(store, origin, local + IVec3::UP) {
                self.schedule_drop(store, ao, ai, self.drop_strength);
            }
            store.rebuild_surfaces(origin);
            self.stats.rebuilds += 1;
            if bo != origin {
                store.rebuild_surfaces(bo);
                self.stats.rebuilds += 1;
            }
            self.tasks.emit_after(
                self.drop_delay,
                EditTask::Drop {
                    origin: bo,
                    index: bi,
                    strength,
                },
            );
        } else if v.can_flow() {
            for (k, dir) in FLOW_DIRS.into_iter().enumerate() {
                self.flow_into(store, origin, local, v, dir, strength - k as i32);
            }
        }
    }

    fn flow_into(
        &mut self,
        store: &mut ChunkStore,
        origin: ChunkOrigin,
        local: IVec3,
        v: VoxelType,
        dir: IVec3,
        strength: i32,
    ) {
        let strength = strength - 1;
        if strength <= 0 {
            return;
        }
        let Some((no, ni)) = resolve_neighbor(store, origin, local + dir) else {
            return;
        };
        let Some(e) = store.get_mut(no) else {
            return;
        };
        if !e.chunk.voxel(ni).is_air() {
            return;
        }
        e.chunk.replace(ni, v);
        e.rebuild();
        self.stats.rebuilds += 1;
        self.stats.flows += 1;
        self.schedule_drop(store, no, ni, strength);
    }
}
