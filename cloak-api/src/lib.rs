//! Public API for the cloak entity extraction and anonymization pipeline
//!
//! This crate provides a stable facade over the extraction engine: plug in
//! an entity-recognition model, pick options once, then run extraction,
//! numbered redaction, or synthetic replacement over any number of texts.
//!
//! ```no_run
//! use cloak_api::{Cloak, Recognizer};
//! # use cloak_api::Detection;
//! # struct MyModel;
//! # impl Recognizer for MyModel {
//! #     fn extract(&self, _: &str, _: &[String], _: f32)
//! #         -> Result<Vec<Detection>, cloak_api::CoreError> { Ok(vec![]) }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cloak = Cloak::builder().recognizer(MyModel).build()?;
//! let result = cloak.redact("Alice lives in Paris", &["person", "location"])?;
//! println!("{}", result.anonymized_text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;

use cloak_core::{Redactor, Replacer};
use cloak_engine::{EngineError, ExtractionPipeline, PipelineOutput};
use std::sync::Arc;

// Re-export key types
pub use cloak_core::{
    CoreError, Detection, Entity, OverlapStrategy, Recognizer, SyntheticGenerator, UserData,
    ValidationStats, ValueGenerator,
};
pub use cloak_engine::Parallelism;
pub use config::Options;
pub use dto::{Analytics, Anonymized, CacheAnalytics, Extraction};
pub use error::{ApiError, Result};

/// Main entry point for extraction and anonymization
///
/// Holds the model collaborator, the synthetic-value generator, and the
/// request options. Construction validates the options and builds the
/// worker pool and cache; the instance is then safe to share across
/// threads.
pub struct Cloak {
    pipeline: ExtractionPipeline,
    generator: Arc<dyn ValueGenerator>,
    options: Options,
}

impl std::fmt::Debug for Cloak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cloak")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Cloak {
    /// Start building a pipeline
    pub fn builder() -> CloakBuilder {
        CloakBuilder::new()
    }

    /// Create a pipeline with default options
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Result<Self> {
        Self::with_options(recognizer, Options::default())
    }

    /// Create a pipeline with the given options
    pub fn with_options(recognizer: Arc<dyn Recognizer>, options: Options) -> Result<Self> {
        options.validate()?;
        let pipeline = ExtractionPipeline::new(recognizer, options.to_engine_config())?;
        Ok(Self {
            pipeline,
            generator: Arc::new(SyntheticGenerator),
            options,
        })
    }

    /// Extract validated, deduplicated entities from `text`
    pub fn extract(&self, text: &str, labels: &[&str]) -> Result<Extraction> {
        let output = self.run_pipeline(text, labels)?;
        Ok(Extraction {
            entities: output.entities,
            analytics: output.stats.into(),
        })
    }

    /// Redact entities with numbered placeholders
    pub fn redact(&self, text: &str, labels: &[&str]) -> Result<Anonymized> {
        let output = self.run_pipeline(text, labels)?;
        let redactor = Redactor::new(&self.options.placeholder_format, self.options.numbered);
        let redacted = redactor.redact(text, &output.entities);
        Ok(Anonymized {
            anonymized_text: redacted.text,
            entities: output.entities,
            reverse_map: redacted.reverse_map,
            analytics: output.stats.into(),
        })
    }

    /// Replace entities with synthetic values from the generator
    pub fn replace(&self, text: &str, labels: &[&str]) -> Result<Anonymized> {
        let output = self.run_pipeline(text, labels)?;
        let replaced = self
            .replacer()
            .replace(text, &output.entities)
            .map_err(anonymize_error)?;
        Ok(Anonymized {
            anonymized_text: replaced.text,
            entities: output.entities,
            reverse_map: replaced.reverse_map,
            analytics: output.stats.into(),
        })
    }

    /// Replace entities, preferring user-supplied per-label values
    pub fn replace_with_data(
        &self,
        text: &str,
        labels: &[&str],
        user_replacements: &UserData,
    ) -> Result<Anonymized> {
        if user_replacements.is_empty() {
            return Err(ApiError::Config(
                "user_replacements must not be empty".into(),
            ));
        }
        if let Some((label, _)) = user_replacements.iter().find(|(_, values)| values.is_empty()) {
            return Err(ApiError::Config(format!(
                "user_replacements for label '{label}' is empty"
            )));
        }

        let output = self.run_pipeline(text, labels)?;
        let replaced = self
            .replacer()
            .replace_with_data(text, &output.entities, user_replacements)
            .map_err(anonymize_error)?;
        Ok(Anonymized {
            anonymized_text: replaced.text,
            entities: output.entities,
            reverse_map: replaced.reverse_map,
            analytics: output.stats.into(),
        })
    }

    /// Cache analytics, when caching is enabled
    pub fn cache_analytics(&self) -> Option<CacheAnalytics> {
        self.pipeline.cache_stats().map(|c| CacheAnalytics {
            hits: c.hits,
            misses: c.misses,
            evictions: c.evictions,
            len: c.len,
            capacity: c.capacity,
        })
    }

    /// Drop all cached extraction results
    pub fn clear_cache(&self) {
        self.pipeline.clear_cache();
    }

    /// The options this pipeline was built with
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn run_pipeline(&self, text: &str, labels: &[&str]) -> Result<PipelineOutput> {
        let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        Ok(self.pipeline.run(text, &labels)?)
    }

    fn replacer(&self) -> Replacer {
        let replacer = Replacer::new(
            Arc::clone(&self.generator),
            self.options.ensure_consistency,
        );
        if self.options.cycle_user_data {
            replacer
        } else {
            replacer.without_cycling()
        }
    }
}

/// Exhausted replacement data is a caller mistake, not an engine fault
fn anonymize_error(err: CoreError) -> ApiError {
    match err {
        CoreError::ReplacementExhausted { .. } => ApiError::Config(err.to_string()),
        other => ApiError::Engine(EngineError::Core(other)),
    }
}

/// Builder for [`Cloak`]
pub struct CloakBuilder {
    recognizer: Option<Arc<dyn Recognizer>>,
    generator: Arc<dyn ValueGenerator>,
    options: Options,
}

impl Default for CloakBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CloakBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self {
            recognizer: None,
            generator: Arc::new(SyntheticGenerator),
            options: Options::default(),
        }
    }

    /// Set the entity-recognition model (required)
    pub fn recognizer<R: Recognizer + 'static>(mut self, recognizer: R) -> Self {
        self.recognizer = Some(Arc::new(recognizer));
        self
    }

    /// Set a shared entity-recognition model (required)
    pub fn shared_recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Set the synthetic-value generator used by `replace`
    pub fn generator<G: ValueGenerator + 'static>(mut self, generator: G) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    /// Replace the full option set
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the extraction pass cap
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.options.max_passes = passes;
        self
    }

    /// Set the confidence floor
    pub fn min_confidence(mut self, floor: f32) -> Self {
        self.options.min_confidence = floor;
        self
    }

    /// Set the parallel dispatch policy
    pub fn use_parallel(mut self, parallelism: Parallelism) -> Self {
        self.options.use_parallel = parallelism;
        self
    }

    /// Enable or disable extraction result caching
    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.options.use_cache = enabled;
        self
    }

    /// Set the overlap survivor selection rule
    pub fn overlap_strategy(mut self, strategy: OverlapStrategy) -> Self {
        self.options.overlap_strategy = strategy;
        self
    }

    /// Set the redaction placeholder template
    pub fn placeholder_format(mut self, template: impl Into<String>) -> Self {
        self.options.placeholder_format = template.into();
        self
    }

    /// Enable or disable numbered placeholders
    pub fn numbered(mut self, numbered: bool) -> Self {
        self.options.numbered = numbered;
        self
    }

    /// Enable or disable consistent replacement of identical values
    pub fn ensure_consistency(mut self, consistent: bool) -> Self {
        self.options.ensure_consistency = consistent;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<Cloak> {
        let recognizer = self
            .recognizer
            .ok_or_else(|| ApiError::Config("a recognizer is required".into()))?;
        self.options.validate()?;
        let pipeline = ExtractionPipeline::new(recognizer, self.options.to_engine_config())?;
        Ok(Cloak {
            pipeline,
            generator: self.generator,
            options: self.options,
        })
    }
}
