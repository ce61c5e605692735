//! Engine configuration

use crate::error::{EngineError, Result};
use cloak_core::OverlapStrategy;
use std::time::Duration;
use xxhash_rust::xxh3::xxh3_64;

/// Parallel dispatch policy for chunk-level extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// Parallel when the text's word count exceeds the chunk size, so the
    /// input splits into more than one chunk
    #[default]
    Auto,
    /// Always single-threaded
    Never,
    /// Always chunked and dispatched to the worker pool
    Always,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of extraction passes
    pub max_passes: usize,
    /// Threshold of the first pass
    pub initial_confidence: f32,
    /// Threshold floor reached by the final pass
    pub confidence_floor: f32,
    /// Parallel dispatch policy
    pub parallelism: Parallelism,
    /// Words per chunk for parallel dispatch
    pub chunk_size: usize,
    /// Worker pool size
    pub max_workers: usize,
    /// Whether extraction results are cached
    pub use_cache: bool,
    /// Cache capacity in entries
    pub cache_size: usize,
    /// Whether candidates are validated against the original text
    pub enable_validation: bool,
    /// Whether overlapping entities are reduced to a disjoint set
    pub resolve_overlaps: bool,
    /// Survivor selection rule for overlapping entities
    pub overlap_strategy: OverlapStrategy,
    /// Whether adjacent same-label entities are merged
    pub merge_entities: bool,
    /// Separator character tolerated in merge gaps
    pub merge_separator: char,
    /// Overall request deadline; pending chunk tasks past the deadline are
    /// abandoned and the request proceeds with whatever completed
    pub request_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_passes: 2,
            initial_confidence: 0.5,
            confidence_floor: 0.30,
            parallelism: Parallelism::Auto,
            chunk_size: 600,
            max_workers: 4,
            use_cache: true,
            cache_size: 128,
            enable_validation: true,
            resolve_overlaps: true,
            overlap_strategy: OverlapStrategy::HighestConfidence,
            merge_entities: true,
            merge_separator: '-',
            request_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, failing fast before any model call
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(EngineError::Config("max_passes must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.initial_confidence) {
            return Err(EngineError::Config(format!(
                "initial_confidence {} outside [0, 1]",
                self.initial_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(EngineError::Config(format!(
                "confidence_floor {} outside [0, 1]",
                self.confidence_floor
            )));
        }
        if self.confidence_floor > self.initial_confidence {
            return Err(EngineError::Config(
                "confidence_floor must not exceed initial_confidence".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(EngineError::Config("chunk_size must be positive".into()));
        }
        if self.max_workers == 0 {
            return Err(EngineError::Config("max_workers must be positive".into()));
        }
        if self.use_cache && self.cache_size == 0 {
            return Err(EngineError::Config(
                "cache_size must be positive when the cache is enabled".into(),
            ));
        }
        Ok(())
    }

    /// Pass thresholds, descending evenly from `initial_confidence` to
    /// `confidence_floor`
    pub fn threshold_schedule(&self) -> Vec<f32> {
        let passes = self.max_passes.max(1);
        if passes == 1 {
            return vec![self.initial_confidence];
        }
        let step =
            (self.initial_confidence - self.confidence_floor) / (passes as f32 - 1.0);
        (0..passes)
            .map(|i| self.initial_confidence - step * i as f32)
            .collect()
    }

    /// Digest of the request-shaping options, folded into every cache
    /// fingerprint so identical requests hit and differing ones do not
    pub fn fingerprint_digest(&self) -> u64 {
        let canonical = format!(
            "passes={};start={};floor={};validate={};resolve={};strategy={:?};merge={};sep={}",
            self.max_passes,
            self.initial_confidence.to_bits(),
            self.confidence_floor.to_bits(),
            self.enable_validation,
            self.resolve_overlaps,
            self.overlap_strategy,
            self.merge_entities,
            self.merge_separator,
        );
        xxh3_64(canonical.as_bytes())
    }
}
