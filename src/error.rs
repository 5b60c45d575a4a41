//! Errors raised while loading level and tuning data
//!
//! The simulation itself has no recoverable failure modes; everything that
//! can go wrong happens before the first tick.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level grid has no tiles")]
    Empty,
    #[error("failed to read level file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning data")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be at least 1 tick")]
    ZeroInterval { field: &'static str },
}
