//! Orchestration layer for the cloak entity extraction pipeline
//!
//! This crate coordinates the external extraction model: word-aligned
//! chunking, multi-pass threshold scheduling, worker-pool fan-out,
//! result caching, and composition with the post-processing stages from
//! `cloak-core`.

#![warn(missing_docs)]

pub mod cache;
pub mod chunker;
pub mod config;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod pipeline;

// Re-export key types
pub use cache::{CacheStats, ExtractionCache, Fingerprint};
pub use chunker::{word_count, TextChunk, WordChunker};
pub use config::{EngineConfig, Parallelism};
pub use error::{EngineError, Result};
pub use orchestrator::{ExecutionMethod, ExtractionStats, Orchestrator};
pub use pipeline::{ExtractionPipeline, PipelineOutput, PipelineStats};

// Re-export from core for convenience
pub use cloak_core::{Entity, OverlapStrategy, Recognizer};
