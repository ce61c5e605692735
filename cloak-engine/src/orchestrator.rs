//! Multi-pass extraction orchestration
//!
//! Runs the threshold schedule against the model collaborator. Passes are
//! sequential; within a pass, chunks fan out to the worker pool and are
//! collected at a barrier before the accept step. A chunk whose model call
//! fails is retried once and then contributes nothing; it never aborts the
//! rest of the document.

use crate::{
    cache::{CacheStats, ExtractionCache, Fingerprint},
    chunker::word_count,
    config::{EngineConfig, Parallelism},
    error::Result,
};
use cloak_core::{entity::sort_by_span, Entity, Recognizer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use crate::chunker::{TextChunk, WordChunker};
#[cfg(feature = "parallel")]
use std::sync::mpsc;

/// Delay before the single retry of a failed model call
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// How a request was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMethod {
    /// One model call per pass over the whole text
    Sequential,
    /// Chunk-level fan-out to the worker pool
    Parallel,
}

/// Counters describing one orchestrated extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Execution method actually used
    pub method: ExecutionMethod,
    /// Passes run before completion or early stop
    pub passes_completed: usize,
    /// Raw candidates collected across all passes
    pub raw_candidates: usize,
    /// Chunk tasks that failed persistently or were abandoned at the
    /// deadline
    pub failed_chunks: usize,
}

impl Default for ExtractionStats {
    fn default() -> Self {
        Self {
            method: ExecutionMethod::Sequential,
            passes_completed: 0,
            raw_candidates: 0,
            failed_chunks: 0,
        }
    }
}

/// Drives the extraction model across passes, chunks and the cache
pub struct Orchestrator {
    recognizer: Arc<dyn Recognizer>,
    cache: Option<Arc<ExtractionCache>>,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
    config: EngineConfig,
}

impl Orchestrator {
    /// Create an orchestrator for the given model and configuration
    pub fn new(recognizer: Arc<dyn Recognizer>, config: EngineConfig) -> Result<Self> {
        let cache = config
            .use_cache
            .then(|| Arc::new(ExtractionCache::new(config.cache_size)));

        #[cfg(feature = "parallel")]
        let pool = crate::executor::build_pool(&config)?;

        Ok(Self {
            recognizer,
            cache,
            #[cfg(feature = "parallel")]
            pool,
            config,
        })
    }

    /// Extract entities from `text`, sorted by span
    ///
    /// Model failures are absorbed per chunk; the result is whatever the
    /// surviving chunks produced.
    pub fn extract(&self, text: &str, labels: &[String]) -> (Vec<Entity>, ExtractionStats) {
        let mut stats = ExtractionStats::default();
        let parallel = self.parallel_enabled(word_count(text));
        stats.method = if parallel {
            ExecutionMethod::Parallel
        } else {
            ExecutionMethod::Sequential
        };

        #[cfg(feature = "parallel")]
        let chunks = if parallel {
            WordChunker::new(self.config.chunk_size).chunk(text)
        } else {
            Vec::new()
        };

        let digest = self.config.fingerprint_digest();
        let schedule = self.config.threshold_schedule();
        let deadline = self.config.request_timeout.map(|t| Instant::now() + t);
        let labels = Arc::new(labels.to_vec());

        let mut accepted: Vec<Entity> = Vec::new();
        for (pass, &threshold) in schedule.iter().enumerate() {
            stats.passes_completed = pass + 1;

            #[cfg(feature = "parallel")]
            let found = match (parallel, self.pool.as_ref()) {
                (true, Some(pool)) => self.parallel_pass(
                    pool, &chunks, &labels, threshold, pass, digest, deadline, &mut stats,
                ),
                _ => self.sequential_pass(text, &labels, threshold, pass, digest, &mut stats),
            };
            #[cfg(not(feature = "parallel"))]
            let found = self.sequential_pass(text, &labels, threshold, pass, digest, &mut stats);

            stats.raw_candidates += found.len();
            let added = absorb(&mut accepted, found);
            debug!(pass, threshold, added, "extraction pass complete");

            if added == 0 {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!("request deadline reached, skipping remaining passes");
                break;
            }
        }

        sort_by_span(&mut accepted);
        (accepted, stats)
    }

    /// Cache analytics, when caching is enabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Drop all cached extraction results
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    fn parallel_enabled(&self, words: usize) -> bool {
        #[cfg(feature = "parallel")]
        {
            if self.pool.is_none() {
                return false;
            }
            match self.config.parallelism {
                Parallelism::Never => false,
                Parallelism::Always => true,
                Parallelism::Auto => words > self.config.chunk_size,
            }
        }
        #[cfg(not(feature = "parallel"))]
        {
            let _ = words;
            false
        }
    }

    fn sequential_pass(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
        pass: usize,
        digest: u64,
        stats: &mut ExtractionStats,
    ) -> Vec<Entity> {
        match extract_with_retry(
            self.recognizer.as_ref(),
            self.cache.as_deref(),
            text,
            labels,
            threshold,
            pass,
            digest,
        ) {
            Some(entities) => entities,
            None => {
                stats.failed_chunks += 1;
                Vec::new()
            }
        }
    }

    /// Fan out one pass's chunks to the pool and join at the barrier
    #[cfg(feature = "parallel")]
    #[allow(clippy::too_many_arguments)]
    fn parallel_pass(
        &self,
        pool: &rayon::ThreadPool,
        chunks: &[TextChunk],
        labels: &Arc<Vec<String>>,
        threshold: f32,
        pass: usize,
        digest: u64,
        deadline: Option<Instant>,
        stats: &mut ExtractionStats,
    ) -> Vec<Entity> {
        let (tx, rx) = mpsc::channel();
        for (index, chunk) in chunks.iter().enumerate() {
            let tx = tx.clone();
            let recognizer = Arc::clone(&self.recognizer);
            let cache = self.cache.clone();
            let labels = Arc::clone(labels);
            let text = chunk.text.clone();
            pool.spawn(move || {
                let outcome = extract_with_retry(
                    recognizer.as_ref(),
                    cache.as_deref(),
                    &text,
                    &labels,
                    threshold,
                    pass,
                    digest,
                );
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut found = Vec::new();
        let mut received = 0usize;
        while received < chunks.len() {
            let message = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        break;
                    }
                    match rx.recv_timeout(remaining) {
                        Ok(message) => message,
                        Err(_) => break,
                    }
                }
                None => match rx.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                },
            };
            received += 1;
            match message {
                (index, Some(mut entities)) => {
                    // Chunk-local coordinates back into document space
                    for entity in &mut entities {
                        entity.shift(chunks[index].offset);
                    }
                    found.extend(entities);
                }
                (_, None) => stats.failed_chunks += 1,
            }
        }

        if received < chunks.len() {
            let abandoned = chunks.len() - received;
            stats.failed_chunks += abandoned;
            warn!(abandoned, "deadline reached before all chunk tasks completed");
        }
        found
    }
}

/// Merge one pass's findings into the accepted set
///
/// A candidate is dropped when it overlaps an entity of equal or higher
/// confidence accepted in a prior pass; overlaps discovered within the
/// same pass are left for the overlap resolver.
fn absorb(accepted: &mut Vec<Entity>, found: Vec<Entity>) -> usize {
    let prior = accepted.len();
    let mut added = 0usize;
    for candidate in found {
        let shadowed = accepted[..prior]
            .iter()
            .any(|e| e.overlaps(&candidate) && e.confidence >= candidate.confidence);
        if !shadowed {
            accepted.push(candidate);
            added += 1;
        }
    }
    added
}

/// One cached model call, promoting detections to entities
fn extract_unit(
    recognizer: &dyn Recognizer,
    cache: Option<&ExtractionCache>,
    text: &str,
    labels: &[String],
    threshold: f32,
    pass: usize,
    digest: u64,
) -> cloak_core::Result<Vec<Entity>> {
    let fingerprint = cache.map(|_| Fingerprint::new(text, labels, threshold, digest));
    if let (Some(cache), Some(fingerprint)) = (cache, fingerprint.as_ref()) {
        if let Some(hit) = cache.get(fingerprint) {
            return Ok(hit);
        }
    }

    let detections = recognizer.extract(text, labels, threshold)?;
    let entities: Vec<Entity> = detections
        .into_iter()
        .map(|detection| Entity::from_detection(detection, pass))
        .collect();

    if let (Some(cache), Some(fingerprint)) = (cache, fingerprint) {
        cache.insert(fingerprint, entities.clone());
    }
    Ok(entities)
}

/// Retry-once policy around a model call
fn extract_with_retry(
    recognizer: &dyn Recognizer,
    cache: Option<&ExtractionCache>,
    text: &str,
    labels: &[String],
    threshold: f32,
    pass: usize,
    digest: u64,
) -> Option<Vec<Entity>> {
    match extract_unit(recognizer, cache, text, labels, threshold, pass, digest) {
        Ok(entities) => Some(entities),
        Err(first) => {
            warn!(error = %first, "model call failed, retrying once");
            std::thread::sleep(RETRY_BACKOFF);
            match extract_unit(recognizer, cache, text, labels, threshold, pass, digest) {
                Ok(entities) => Some(entities),
                Err(second) => {
                    warn!(error = %second, "model call failed after retry, dropping chunk");
                    None
                }
            }
        }
    }
}
