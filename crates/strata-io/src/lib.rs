//! Save/load of whole worlds as a flat serde record.
#![forbid(unsafe_code)]

mod file;
mod world_data;

pub use file::{DEFAULT_SAVE_DIR, load_world, save_file_name, save_path, save_world};
pub use world_data::{RestoredChunk, RestoredWorld, WorldData};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save data does not match this world: {0}")]
    Mismatch(String),
}
