//! Entity model
//!
//! Spans are byte offsets into the original text, half-open, and always on
//! UTF-8 character boundaries.

use serde::{Deserialize, Serialize};

/// A raw candidate as returned by the extraction model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Start byte offset in the analyzed text
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// The matched text
    pub text: String,
    /// Entity label
    pub label: String,
    /// Model confidence in [0, 1]
    pub confidence: f32,
}

/// A labeled span accepted into the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Start byte offset in the original text
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// The matched text; must equal the original text slice at `start..end`
    pub text: String,
    /// Entity label
    pub label: String,
    /// Model confidence in [0, 1]
    pub confidence: f32,
    /// Index of the extraction pass whose threshold produced this entity
    pub source_pass: usize,
}

impl Entity {
    /// Promote a model detection into a pipeline entity
    pub fn from_detection(detection: Detection, source_pass: usize) -> Self {
        Self {
            start: detection.start,
            end: detection.end,
            text: detection.text,
            label: detection.label,
            confidence: detection.confidence,
            source_pass,
        }
    }

    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for a degenerate (empty) span
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether the `[start, end)` ranges of two entities intersect
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Shift the span by `offset` bytes (chunk-local to document coordinates)
    pub fn shift(&mut self, offset: usize) {
        self.start += offset;
        self.end += offset;
    }
}

/// Sort entities by start offset, then end offset
///
/// Downstream algorithms assume this ordering; it is applied once after
/// extraction so results are deterministic regardless of worker scheduling.
pub fn sort_by_span(entities: &mut [Entity]) {
    entities.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(start: usize, end: usize) -> Entity {
        Entity {
            start,
            end,
            text: String::new(),
            label: "person".to_string(),
            confidence: 0.9,
            source_pass: 0,
        }
    }

    #[test]
    fn overlap_detection() {
        assert!(entity(0, 5).overlaps(&entity(4, 8)));
        assert!(entity(4, 8).overlaps(&entity(0, 5)));
        assert!(entity(0, 5).overlaps(&entity(0, 5)));
        // Half-open ranges: touching spans do not overlap
        assert!(!entity(0, 5).overlaps(&entity(5, 8)));
        assert!(!entity(5, 8).overlaps(&entity(0, 5)));
    }

    #[test]
    fn shift_moves_both_offsets() {
        let mut e = entity(3, 7);
        e.shift(10);
        assert_eq!((e.start, e.end), (13, 17));
    }

    #[test]
    fn sort_is_by_start_then_end() {
        let mut entities = vec![entity(5, 9), entity(0, 8), entity(0, 4)];
        sort_by_span(&mut entities);
        let spans: Vec<_> = entities.iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(spans, vec![(0, 4), (0, 8), (5, 9)]);
    }
}
