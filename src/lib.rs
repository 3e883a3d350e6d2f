//! strata: a chunked voxel world with streaming and block physics.
#![forbid(unsafe_code)]

pub mod app;
pub mod command;

pub use app::{App, AppError, WorldSource};
pub use command::Command;
