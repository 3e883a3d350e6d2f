use std::collections::{BTreeMap, VecDeque};

pub struct TaskEnvelope<T> {
    pub id: u64,
    pub tick: u64,
    pub task: T,
}

/// Tick-bucketed FIFO of deferred work. Tasks due on the same tick pop in
/// the order they were emitted.
pub struct TaskQueue<T> {
    // map of tick -> FIFO queue of tasks
    by_tick: BTreeMap<u64, VecDeque<TaskEnvelope<T>>>,
    now: u64,
    next_id: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, task: T) -> u64 {
        self.emit_at(self.now, task)
    }

    pub fn emit_at(&mut self, tick: u64, task: T) -> u64 {
        let id = self.alloc_id();
        let env = TaskEnvelope { id, tick, task };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn emit_after(&mut self, delta: u64, task: T) -> u64 {
        self.emit_at(self.now + delta, task)
    }

    /// Next task due at or before the current tick. Overdue buckets drain
    /// before the current one.
    pub fn pop_ready(&mut self) -> Option<TaskEnvelope<T>> {
        loop {
            let mut entry = self.by_tick.first_entry()?;
            if *entry.key() > self.now {
                return None;
            }
            if let Some(env) = entry.get_mut().pop_front() {
                return Some(env);
            }
            entry.remove();
        }
    }

    pub fn advance_tick(&mut self) {
        // clean empty current bucket
        if self.by_tick.get(&self.now).is_some_and(VecDeque::is_empty) {
            self.by_tick.remove(&self.now);
        }
        self.now = self.now.wrapping_add(1);
    }

    /// Number of tasks still waiting, due or not.
    pub fn len(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
