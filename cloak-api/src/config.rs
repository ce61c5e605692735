//! High-level request options
//!
//! `Options` enumerates every recognized knob as a typed field, so there is
//! no dynamic key space to misspell: unknown options simply do not exist at
//! compile time. Validation runs before any model call.

use crate::error::{ApiError, Result};
use cloak_core::OverlapStrategy;
use cloak_engine::{EngineConfig, Parallelism};
use std::time::Duration;

/// Threshold of the first extraction pass
const INITIAL_CONFIDENCE: f32 = 0.5;

/// Options for extraction and anonymization requests
#[derive(Debug, Clone)]
pub struct Options {
    /// Cap on extraction passes
    pub max_passes: usize,
    /// Confidence floor: final pass threshold and validation cutoff
    pub min_confidence: f32,
    /// Parallel dispatch policy
    pub use_parallel: Parallelism,
    /// Words per chunk for parallel dispatch
    pub chunk_size: usize,
    /// Worker pool size
    pub max_workers: usize,
    /// Whether candidates are validated against the original text
    pub enable_validation: bool,
    /// Whether overlapping entities are reduced to a disjoint set
    pub resolve_overlaps: bool,
    /// Survivor selection rule for overlapping entities
    pub overlap_strategy: OverlapStrategy,
    /// Whether extraction results are cached
    pub use_cache: bool,
    /// Cache capacity in entries
    pub cache_size: usize,
    /// Whether adjacent same-label entities are merged
    pub merge_entities: bool,
    /// Whether redaction placeholders carry per-label ids
    pub numbered: bool,
    /// Redaction placeholder template with `{id}` and `{label}` markers
    pub placeholder_format: String,
    /// Whether identical values reuse their first replacement
    pub ensure_consistency: bool,
    /// Whether exhausted user replacement lists wrap around; disabling this
    /// turns exhaustion into a configuration error
    pub cycle_user_data: bool,
    /// Overall request deadline
    pub request_timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_passes: 2,
            min_confidence: 0.30,
            use_parallel: Parallelism::Auto,
            chunk_size: 600,
            max_workers: 4,
            enable_validation: true,
            resolve_overlaps: true,
            overlap_strategy: OverlapStrategy::HighestConfidence,
            use_cache: true,
            cache_size: 128,
            merge_entities: true,
            numbered: true,
            placeholder_format: cloak_core::anonymize::redactor::DEFAULT_TEMPLATE.to_string(),
            ensure_consistency: true,
            cycle_user_data: true,
            request_timeout: None,
        }
    }
}

impl Options {
    /// Check the options, surfacing configuration errors before any model
    /// call
    pub fn validate(&self) -> Result<()> {
        if !self.placeholder_format.contains("{label}") {
            return Err(ApiError::Config(
                "placeholder_format must contain a {label} marker".into(),
            ));
        }
        if self.numbered && !self.placeholder_format.contains("{id}") {
            return Err(ApiError::Config(
                "numbered redaction requires an {id} marker in placeholder_format".into(),
            ));
        }
        self.to_engine_config().validate()?;
        Ok(())
    }

    /// Map to the engine configuration
    ///
    /// The first-pass threshold is fixed at 0.5 and raised to the floor if
    /// a caller configures a floor above it.
    pub(crate) fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_passes: self.max_passes,
            initial_confidence: INITIAL_CONFIDENCE.max(self.min_confidence),
            confidence_floor: self.min_confidence,
            parallelism: self.use_parallel,
            chunk_size: self.chunk_size,
            max_workers: self.max_workers,
            use_cache: self.use_cache,
            cache_size: self.cache_size,
            enable_validation: self.enable_validation,
            resolve_overlaps: self.resolve_overlaps,
            overlap_strategy: self.overlap_strategy,
            merge_entities: self.merge_entities,
            merge_separator: '-',
            request_timeout: self.request_timeout,
        }
    }
}
