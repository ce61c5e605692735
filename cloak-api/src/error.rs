//! API error types

use cloak_engine::EngineError;
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine layer error
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration error, raised before any model call
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
