//! Core error types

use thiserror::Error;

/// Errors raised by the domain layer
#[derive(Error, Debug)]
pub enum CoreError {
    /// The extraction model collaborator failed
    #[error("recognizer failure: {0}")]
    Recognizer(String),

    /// User-supplied replacement data ran out with cycling disabled
    #[error("replacement data exhausted for label '{label}'")]
    ReplacementExhausted {
        /// Label whose replacement list was exhausted
        label: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
