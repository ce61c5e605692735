//! Adjacent entity merging
//!
//! Coalesces same-label neighbors separated by a negligible gap, e.g. a
//! first and last name split by the model, or a hyphenated compound.

use crate::entity::Entity;
use tracing::debug;

/// Merges adjacent same-label entities
///
/// Two neighbors merge when the text strictly between their spans consists
/// only of whitespace and/or at most one occurrence of the configured
/// separator character. Input must be overlap-free and sorted by start.
#[derive(Debug, Clone)]
pub struct EntityMerger {
    separator: char,
}

impl Default for EntityMerger {
    fn default() -> Self {
        Self { separator: '-' }
    }
}

impl EntityMerger {
    /// Create a merger with a custom gap separator
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// Merge entities in a single left-to-right sweep
    ///
    /// A merged entity takes the union span, the text slice at that span,
    /// and the maximum of the two confidences; it may itself merge with the
    /// following entity.
    pub fn merge(&self, entities: Vec<Entity>, text: &str) -> (Vec<Entity>, usize) {
        let mut iter = entities.into_iter();
        let mut current = match iter.next() {
            Some(first) => first,
            None => return (Vec::new(), 0),
        };

        let mut merged = Vec::new();
        let mut merges_applied = 0usize;

        for next in iter {
            if self.can_merge(&current, &next, text) {
                current.end = next.end;
                current.text = text[current.start..current.end].to_string();
                current.confidence = current.confidence.max(next.confidence);
                current.source_pass = current.source_pass.min(next.source_pass);
                merges_applied += 1;
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
        merged.push(current);

        if merges_applied > 0 {
            debug!(merges = merges_applied, "adjacent entities merged");
        }
        (merged, merges_applied)
    }

    fn can_merge(&self, left: &Entity, right: &Entity, text: &str) -> bool {
        if left.label != right.label || right.start < left.end {
            return false;
        }
        match text.get(left.end..right.start) {
            Some(gap) => self.gap_is_negligible(gap),
            None => false,
        }
    }

    fn gap_is_negligible(&self, gap: &str) -> bool {
        let mut separators = 0usize;
        for ch in gap.chars() {
            if ch.is_whitespace() {
                continue;
            }
            if ch == self.separator {
                separators += 1;
                if separators > 1 {
                    return false;
                }
                continue;
            }
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn merges_space_separated_neighbors() {
        let text = "John Smith works here";
        let (merged, count) = EntityMerger::default().merge(
            vec![
                entity(0, 4, "John", "person", 0.8),
                entity(5, 10, "Smith", "person", 0.6),
            ],
            text,
        );
        assert_eq!(count, 1);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "John Smith");
        assert_eq!((merged[0].start, merged[0].end), (0, 10));
        assert_eq!(merged[0].confidence, 0.8);
    }

    #[test]
    fn merges_directly_adjacent_spans() {
        let text = "JohnSmith";
        let (merged, _) = EntityMerger::default().merge(
            vec![
                entity(0, 4, "John", "person", 0.5),
                entity(4, 9, "Smith", "person", 0.7),
            ],
            text,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "JohnSmith");
        assert_eq!(merged[0].confidence, 0.7);
    }

    #[test]
    fn merges_across_single_separator() {
        let text = "Jean-Luc arrives";
        let (merged, _) = EntityMerger::default().merge(
            vec![
                entity(0, 4, "Jean", "person", 0.9),
                entity(5, 8, "Luc", "person", 0.85),
            ],
            text,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Jean-Luc");
    }

    #[test]
    fn chain_merge_in_one_sweep() {
        let text = "Anna Maria Lopez";
        let (merged, count) = EntityMerger::default().merge(
            vec![
                entity(0, 4, "Anna", "person", 0.6),
                entity(5, 10, "Maria", "person", 0.7),
                entity(11, 16, "Lopez", "person", 0.9),
            ],
            text,
        );
        assert_eq!(count, 2);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Anna Maria Lopez");
        assert_eq!(merged[0].confidence, 0.9);
    }

    #[test]
    fn different_labels_do_not_merge() {
        let text = "Paris Hilton";
        let (merged, count) = EntityMerger::default().merge(
            vec![
                entity(0, 5, "Paris", "location", 0.8),
                entity(6, 12, "Hilton", "person", 0.8),
            ],
            text,
        );
        assert_eq!(count, 0);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn wide_gap_with_words_does_not_merge() {
        let text = "John and Mary";
        let (merged, count) = EntityMerger::default().merge(
            vec![
                entity(0, 4, "John", "person", 0.8),
                entity(9, 13, "Mary", "person", 0.8),
            ],
            text,
        );
        assert_eq!(count, 0);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn double_separator_gap_does_not_merge() {
        let text = "ab--cd";
        let (merged, _) = EntityMerger::default().merge(
            vec![
                entity(0, 2, "ab", "code", 0.8),
                entity(4, 6, "cd", "code", 0.8),
            ],
            text,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_input() {
        let (merged, count) = EntityMerger::default().merge(Vec::new(), "text");
        assert!(merged.is_empty());
        assert_eq!(count, 0);
    }
}
