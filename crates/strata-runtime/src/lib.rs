//! Chunk ownership, cooperative schedulers and the generation worker pool.
#![forbid(unsafe_code)]

mod event;
mod pool;
mod store;
mod streaming;

pub use event::{TaskEnvelope, TaskQueue};
pub use pool::WorkerPool;
pub use store::{ChunkEntry, ChunkStore};
pub use streaming::{BuildJob, StreamSettings, StreamStats, StreamingCoordinator};

pub use rayon::ThreadPoolBuildError;
