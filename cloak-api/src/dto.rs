//! Data transfer objects for API results

use cloak_core::{Entity, ValidationStats};
use cloak_engine::{ExecutionMethod, PipelineStats};
use std::collections::HashMap;

/// Cache analytics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheAnalytics {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to the model
    pub misses: u64,
    /// Entries evicted to stay at capacity
    pub evictions: u64,
    /// Current entry count
    pub len: usize,
    /// Configured capacity
    pub capacity: usize,
}

/// Processing metadata for one request
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analytics {
    /// Input length in bytes
    pub text_bytes: usize,
    /// Whitespace-delimited word count of the input
    pub word_count: usize,
    /// Execution method used (`"sequential"` or `"parallel"`)
    pub method: String,
    /// Extraction passes run
    pub passes_completed: usize,
    /// Raw candidates collected before post-processing
    pub raw_candidates: usize,
    /// Chunk tasks lost to model failure or the request deadline
    pub failed_chunks: usize,
    /// Validation counters, when validation ran
    pub validation: Option<ValidationStats>,
    /// Adjacent-entity merges applied
    pub merges_applied: usize,
    /// Cache analytics, when caching is enabled
    pub cache: Option<CacheAnalytics>,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
}

impl From<PipelineStats> for Analytics {
    fn from(stats: PipelineStats) -> Self {
        Self {
            text_bytes: stats.text_bytes,
            word_count: stats.word_count,
            method: match stats.method {
                ExecutionMethod::Sequential => "sequential".to_string(),
                ExecutionMethod::Parallel => "parallel".to_string(),
            },
            passes_completed: stats.passes_completed,
            raw_candidates: stats.raw_candidates,
            failed_chunks: stats.failed_chunks,
            validation: stats.validation,
            merges_applied: stats.merges_applied,
            cache: stats.cache.map(|c| CacheAnalytics {
                hits: c.hits,
                misses: c.misses,
                evictions: c.evictions,
                len: c.len,
                capacity: c.capacity,
            }),
            processing_time_ms: stats.elapsed.as_millis() as u64,
        }
    }
}

/// Result of an extraction request
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extraction {
    /// Final entity list, sorted by span
    pub entities: Vec<Entity>,
    /// Processing metadata
    pub analytics: Analytics,
}

/// Result of a redaction or replacement request
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anonymized {
    /// The rewritten text
    pub anonymized_text: String,
    /// Entities that were anonymized, sorted by span
    pub entities: Vec<Entity>,
    /// Placeholder/replacement token back to the original entity text
    pub reverse_map: HashMap<String, String>,
    /// Processing metadata
    pub analytics: Analytics,
}
