//! Pipeline composition
//!
//! Ties the orchestrator to the downstream entity processing stages:
//! validation, overlap resolution and merging, each individually
//! switchable through the engine configuration.

use crate::{
    cache::CacheStats,
    chunker::word_count,
    config::EngineConfig,
    error::{EngineError, Result},
    orchestrator::{ExecutionMethod, Orchestrator},
};
use cloak_core::{resolve_overlaps, Entity, EntityMerger, EntityValidator, Recognizer, ValidationStats};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Processing metadata for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Input length in bytes
    pub text_bytes: usize,
    /// Whitespace-delimited word count of the input
    pub word_count: usize,
    /// Execution method actually used
    pub method: ExecutionMethod,
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
    /// Cache analytics snapshot, when caching is enabled
    pub cache: Option<CacheStats>,
    /// Wall-clock processing time
    pub elapsed: Duration,
}

/// Entities and metadata produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Final entity list, sorted by span
    pub entities: Vec<Entity>,
    /// Processing metadata
    pub stats: PipelineStats,
}

/// The full extraction pipeline
///
/// text → orchestrator (→ cache) → validator → overlap resolver → merger.
pub struct ExtractionPipeline {
    orchestrator: Orchestrator,
    validator: EntityValidator,
    merger: EntityMerger,
    config: EngineConfig,
}

impl ExtractionPipeline {
    /// Build a pipeline around the given model, failing fast on an invalid
    /// configuration
    pub fn new(recognizer: Arc<dyn Recognizer>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let validator = EntityValidator::new(config.confidence_floor);
        let merger = EntityMerger::new(config.merge_separator);
        let orchestrator = Orchestrator::new(recognizer, config.clone())?;
        Ok(Self {
            orchestrator,
            validator,
            merger,
            config,
        })
    }

    /// Run the pipeline over `text` for the requested `labels`
    pub fn run(&self, text: &str, labels: &[String]) -> Result<PipelineOutput> {
        if labels.is_empty() {
            return Err(EngineError::Config("at least one label is required".into()));
        }

        let started = Instant::now();
        if text.trim().is_empty() {
            return Ok(PipelineOutput {
                entities: Vec::new(),
                stats: self.stats_for_empty(text, started),
            });
        }

        let words = word_count(text);
        let (mut entities, extraction) = self.orchestrator.extract(text, labels);

        let validation = if self.config.enable_validation {
            let (valid, stats) = self.validator.validate(entities, text, labels);
            entities = valid;
            Some(stats)
        } else {
            None
        };

        if self.config.resolve_overlaps {
            entities = resolve_overlaps(entities, self.config.overlap_strategy);
        }

        let mut merges_applied = 0;
        if self.config.merge_entities {
            let (merged, applied) = self.merger.merge(entities, text);
            entities = merged;
            merges_applied = applied;
        }

        Ok(PipelineOutput {
            entities,
            stats: PipelineStats {
                text_bytes: text.len(),
                word_count: words,
                method: extraction.method,
                passes_completed: extraction.passes_completed,
                raw_candidates: extraction.raw_candidates,
                failed_chunks: extraction.failed_chunks,
                validation,
                merges_applied,
                cache: self.orchestrator.cache_stats(),
                elapsed: started.elapsed(),
            },
        })
    }

    /// Cache analytics, when caching is enabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.orchestrator.cache_stats()
    }

    /// Drop all cached extraction results
    pub fn clear_cache(&self) {
        self.orchestrator.clear_cache();
    }

    /// The configuration this pipeline was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn stats_for_empty(&self, text: &str, started: Instant) -> PipelineStats {
        PipelineStats {
            text_bytes: text.len(),
            word_count: 0,
            method: ExecutionMethod::Sequential,
            passes_completed: 0,
            raw_candidates: 0,
            failed_chunks: 0,
            validation: None,
            merges_applied: 0,
            cache: self.orchestrator.cache_stats(),
            elapsed: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parallelism;
    use cloak_core::Detection;

    /// Returns a fixed detection list regardless of input
    struct FixedModel(Vec<Detection>);

    impl Recognizer for FixedModel {
        fn extract(
            &self,
            _text: &str,
            _labels: &[String],
            threshold: f32,
        ) -> cloak_core::Result<Vec<Detection>> {
            Ok(self
                .0
                .iter()
                .filter(|d| d.confidence >= threshold)
                .cloned()
                .collect())
        }
    }

    fn detection(start: usize, end: usize, text: &str, label: &str, confidence: f32) -> Detection {
        Detection {
            start,
            end,
            text: text.to_string(),
            label: label.to_string(),
            confidence,
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> EngineConfig {
        EngineConfig {
            parallelism: Parallelism::Never,
            ..Default::default()
        }
    }

    #[test]
    fn validated_resolved_and_merged() {
        let text = "John Smith works at Acme";
        let model = FixedModel(vec![
            detection(0, 4, "John", "person", 0.8),
            detection(5, 10, "Smith", "person", 0.7),
            // Stale span from a bad remap; must be dropped by validation
            detection(11, 16, "Smith", "person", 0.9),
        ]);
        let pipeline = ExtractionPipeline::new(Arc::new(model), config()).unwrap();
        let output = pipeline.run(text, &labels(&["person"])).unwrap();

        assert_eq!(output.entities.len(), 1);
        assert_eq!(output.entities[0].text, "John Smith");
        assert_eq!(output.stats.merges_applied, 1);
        let validation = output.stats.validation.unwrap();
        assert_eq!(validation.text_mismatch, 1);
    }

    #[test]
    fn overlap_resolution_can_be_disabled() {
        let text = "Alice lives";
        let model = FixedModel(vec![
            detection(0, 5, "Alice", "person", 0.8),
            detection(0, 11, "Alice lives", "person", 0.6),
        ]);
        let engine_config = EngineConfig {
            resolve_overlaps: false,
            merge_entities: false,
            ..config()
        };
        let pipeline = ExtractionPipeline::new(Arc::new(model), engine_config).unwrap();
        let output = pipeline.run(text, &labels(&["person"])).unwrap();
        assert_eq!(output.entities.len(), 2);
    }

    #[test]
    fn empty_text_short_circuits() {
        let model = FixedModel(vec![]);
        let pipeline = ExtractionPipeline::new(Arc::new(model), config()).unwrap();
        let output = pipeline.run("   \n", &labels(&["person"])).unwrap();
        assert!(output.entities.is_empty());
        assert_eq!(output.stats.passes_completed, 0);
    }

    #[test]
    fn empty_label_set_fails_fast() {
        let model = FixedModel(vec![]);
        let pipeline = ExtractionPipeline::new(Arc::new(model), config()).unwrap();
        let err = pipeline.run("some text", &[]).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn invalid_configuration_fails_at_construction() {
        let model = FixedModel(vec![]);
        let bad = EngineConfig {
            initial_confidence: 2.0,
            ..Default::default()
        };
        assert!(ExtractionPipeline::new(Arc::new(model), bad).is_err());
    }
}
