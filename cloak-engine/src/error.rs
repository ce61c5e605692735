//! Layered error types

use cloak_core::CoreError;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Domain layer error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Worker pool could not be built
    #[error("worker pool error: {0}")]
    Pool(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
