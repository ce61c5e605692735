//! Anonymization strategies
//!
//! Two interchangeable strategies consume the final entity list and the
//! original text: [`Redactor`] substitutes numbered placeholders,
//! [`Replacer`] substitutes synthetic or user-supplied values. Both return
//! the rewritten text together with a reverse map for re-identification.
//!
//! Rewriting never mutates the source text: each strategy builds a sorted,
//! non-overlapping replacement plan and produces a fresh string from it.

pub mod generator;
pub mod redactor;
pub mod replacer;

pub use generator::{SyntheticGenerator, ValueGenerator};
pub use redactor::Redactor;
pub use replacer::{Replacer, UserData};

use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One substitution applied to the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedReplacement {
    /// Entity label
    pub label: String,
    /// Original entity text
    pub original: String,
    /// Substituted value or placeholder
    pub replacement: String,
    /// Start byte offset of the original span
    pub start: usize,
    /// End byte offset of the original span
    pub end: usize,
}

/// Result of one anonymization call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// The rewritten text
    pub text: String,
    /// Placeholder/replacement token back to the original entity text
    pub reverse_map: HashMap<String, String>,
    /// Every substitution, in document order
    pub replacements: Vec<AppliedReplacement>,
}

/// Apply a start-sorted, non-overlapping replacement plan to `text`
fn rewrite(text: &str, plan: &[AppliedReplacement]) -> String {
    let grown: usize = plan
        .iter()
        .map(|r| r.replacement.len().saturating_sub(r.end - r.start))
        .sum();
    let mut out = String::with_capacity(text.len() + grown);
    let mut cursor = 0usize;
    for item in plan {
        out.push_str(&text[cursor..item.start]);
        out.push_str(&item.replacement);
        cursor = item.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Entities sorted by start offset; anonymization input is already
/// overlap-free, but scheduling order is not guaranteed by callers
fn in_document_order(entities: &[Entity]) -> Vec<&Entity> {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|e| (e.start, e.end));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_replaces_spans_in_place() {
        let plan = vec![
            AppliedReplacement {
                label: "person".into(),
                original: "Alice".into(),
                replacement: "X".into(),
                start: 0,
                end: 5,
            },
            AppliedReplacement {
                label: "location".into(),
                original: "Paris".into(),
                replacement: "YY".into(),
                start: 15,
                end: 20,
            },
        ];
        assert_eq!(rewrite("Alice lives in Paris", &plan), "X lives in YY");
    }

    #[test]
    fn rewrite_with_empty_plan_returns_input() {
        assert_eq!(rewrite("unchanged", &[]), "unchanged");
    }
}
