//! Runner errors.

use std::path::PathBuf;

use thiserror::Error;

use swarmfall_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid simulation config")]
    Config(#[from] ConfigError),

    #[error("failed to read {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn the game loop thread")]
    SpawnLoop(#[source] std::io::Error),

    #[error("game loop thread panicked")]
    LoopPanicked,

    #[error("failed to encode run summary")]
    Summary(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
