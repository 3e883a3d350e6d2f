use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Dedicated rayon pool for bulk generation and meshing.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `workers == 0` lets rayon pick the thread count.
    pub fn new(workers: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("strata-gen-{i}"))
            .build()?;
        log::info!(target: "perf", "worker pool ready threads={}", pool.current_num_threads());
        Ok(Self { pool })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `f` with this pool as the ambient rayon pool.
    pub fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(f)
    }
}
