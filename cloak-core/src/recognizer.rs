//! Extraction model boundary

use crate::{entity::Detection, error::Result};

/// Interface to the external entity-recognition model
///
/// Implementations must tolerate concurrent calls from multiple worker
/// threads. A failed call returns `CoreError::Recognizer`; the orchestrator
/// retries once per chunk and otherwise treats the chunk as empty.
pub trait Recognizer: Send + Sync {
    /// Detect entities in `text` for the given labels at the given
    /// confidence threshold
    fn extract(&self, text: &str, labels: &[String], threshold: f32) -> Result<Vec<Detection>>;
}
