//! Candidate entity validation
//!
//! Every candidate is checked for structural and semantic consistency
//! against the original text. Rejections are silent from the pipeline's
//! point of view; they are only counted for analytics.

use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Counters describing one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Candidates examined
    pub total: usize,
    /// Dropped: confidence below the configured floor
    pub below_confidence: usize,
    /// Dropped: degenerate span, out of bounds, or off a char boundary
    pub invalid_span: usize,
    /// Dropped: entity text does not match the text at its span
    pub text_mismatch: usize,
    /// Dropped: label not in the requested label set
    pub unknown_label: usize,
    /// Candidates that survived
    pub passed: usize,
}

/// Validates candidate entities against the original text
#[derive(Debug, Clone)]
pub struct EntityValidator {
    min_confidence: f32,
}

impl EntityValidator {
    /// Create a validator with the given confidence floor
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }

    /// Filter `entities`, keeping only candidates that are consistent with
    /// `text` and the requested `labels`
    ///
    /// Never fails; an empty survivor list is a valid outcome.
    pub fn validate(
        &self,
        entities: Vec<Entity>,
        text: &str,
        labels: &[String],
    ) -> (Vec<Entity>, ValidationStats) {
        let mut stats = ValidationStats {
            total: entities.len(),
            ..Default::default()
        };

        let mut valid = Vec::with_capacity(entities.len());
        for entity in entities {
            if !entity.confidence.is_finite()
                || !(0.0..=1.0).contains(&entity.confidence)
                || entity.confidence < self.min_confidence
            {
                stats.below_confidence += 1;
                continue;
            }

            // `get` rejects reversed spans, out-of-bounds offsets, and
            // offsets that fall inside a multi-byte character
            let slice = match text.get(entity.start..entity.end) {
                Some(s) if entity.start < entity.end => s,
                _ => {
                    stats.invalid_span += 1;
                    continue;
                }
            };

            // Guards against stale offsets after chunk remapping
            if slice != entity.text {
                stats.text_mismatch += 1;
                continue;
            }

            if !labels.iter().any(|l| l == &entity.label) {
                stats.unknown_label += 1;
                continue;
            }

            valid.push(entity);
        }

        stats.passed = valid.len();
        debug!(
            total = stats.total,
            passed = stats.passed,
            "entity validation complete"
        );
        (valid, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Alice lives in Paris";

    fn labels() -> Vec<String> {
        vec!["person".to_string(), "location".to_string()]
    }

    fn entity(start: usize, end: usize, text: &str, label: &str, confidence: f32) -> Entity {
        Entity {
            start,
            end,
            text: text.to_string(),
            label: label.to_string(),
            confidence,
            source_pass: 0,
        }
    }

    #[test]
    fn accepts_consistent_entity() {
        let validator = EntityValidator::new(0.3);
        let (valid, stats) = validator.validate(
            vec![entity(0, 5, "Alice", "person", 0.9)],
            TEXT,
            &labels(),
        );
        assert_eq!(valid.len(), 1);
        assert_eq!(stats.passed, 1);
    }

    #[test]
    fn rejects_reversed_and_out_of_bounds_spans() {
        let validator = EntityValidator::new(0.0);
        let (valid, stats) = validator.validate(
            vec![
                entity(5, 5, "", "person", 0.9),
                entity(5, 2, "ice", "person", 0.9),
                entity(15, 99, "Paris", "location", 0.9),
            ],
            TEXT,
            &labels(),
        );
        assert!(valid.is_empty());
        assert_eq!(stats.invalid_span, 3);
    }

    #[test]
    fn rejects_span_inside_multibyte_character() {
        let validator = EntityValidator::new(0.0);
        let text = "héllo";
        // Offset 2 is inside the two-byte 'é'
        let (valid, stats) = validator.validate(
            vec![entity(1, 2, "é", "person", 0.9)],
            text,
            &labels(),
        );
        assert!(valid.is_empty());
        assert_eq!(stats.invalid_span, 1);
    }

    #[test]
    fn rejects_text_mismatch() {
        let validator = EntityValidator::new(0.0);
        let (valid, stats) = validator.validate(
            vec![entity(0, 5, "Bob", "person", 0.9)],
            TEXT,
            &labels(),
        );
        assert!(valid.is_empty());
        assert_eq!(stats.text_mismatch, 1);
    }

    #[test]
    fn rejects_confidence_out_of_range_or_below_floor() {
        let validator = EntityValidator::new(0.5);
        let (valid, stats) = validator.validate(
            vec![
                entity(0, 5, "Alice", "person", 1.2),
                entity(0, 5, "Alice", "person", -0.1),
                entity(0, 5, "Alice", "person", 0.4),
            ],
            TEXT,
            &labels(),
        );
        assert!(valid.is_empty());
        assert_eq!(stats.below_confidence, 3);
    }

    #[test]
    fn rejects_unrequested_label() {
        let validator = EntityValidator::new(0.0);
        let (valid, stats) = validator.validate(
            vec![entity(0, 5, "Alice", "company", 0.9)],
            TEXT,
            &labels(),
        );
        assert!(valid.is_empty());
        assert_eq!(stats.unknown_label, 1);
    }

    #[test]
    fn empty_input_is_a_valid_outcome() {
        let validator = EntityValidator::new(0.3);
        let (valid, stats) = validator.validate(Vec::new(), TEXT, &labels());
        assert!(valid.is_empty());
        assert_eq!(stats, ValidationStats::default());
    }
}
