//! Numbered placeholder redaction

use crate::anonymize::{in_document_order, rewrite, AnonymizedText, AppliedReplacement};
use crate::entity::Entity;
use std::collections::HashMap;

/// Redacts entities with numbered placeholders
///
/// Ids are assigned per label in document order: the first distinct value
/// seen under a label gets 1, and every later occurrence of the identical
/// value under that label reuses its id. The same value therefore always
/// maps to the same placeholder within one call.
#[derive(Debug, Clone)]
pub struct Redactor {
    template: String,
    numbered: bool,
}

/// Default placeholder template
pub const DEFAULT_TEMPLATE: &str = "#{id}_{label}_REDACTED";

impl Default for Redactor {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            numbered: true,
        }
    }
}

impl Redactor {
    /// Create a redactor with a custom template containing `{id}` and
    /// `{label}` markers
    pub fn new(template: impl Into<String>, numbered: bool) -> Self {
        Self {
            template: template.into(),
            numbered,
        }
    }

    /// Redact `entities` in `text`
    ///
    /// Entities must be non-overlapping; a text without entities is
    /// returned unchanged.
    pub fn redact(&self, text: &str, entities: &[Entity]) -> AnonymizedText {
        let ordered = in_document_order(entities);

        let mut next_id: HashMap<&str, usize> = HashMap::new();
        let mut assigned: HashMap<(&str, &str), usize> = HashMap::new();
        let mut plan = Vec::with_capacity(ordered.len());
        let mut reverse_map = HashMap::new();

        for entity in ordered {
            let id = *assigned
                .entry((entity.label.as_str(), entity.text.as_str()))
                .or_insert_with(|| {
                    let counter = next_id.entry(entity.label.as_str()).or_insert(0);
                    *counter += 1;
                    *counter
                });

            let placeholder = self.render(id, &entity.label);
            reverse_map.insert(placeholder.clone(), entity.text.clone());
            plan.push(AppliedReplacement {
                label: entity.label.clone(),
                original: entity.text.clone(),
                replacement: placeholder,
                start: entity.start,
                end: entity.end,
            });
        }

        AnonymizedText {
            text: rewrite(text, &plan),
            reverse_map,
            replacements: plan,
        }
    }

    fn render(&self, id: usize, label: &str) -> String {
        let label = label.to_uppercase();
        if self.numbered {
            self.template
                .replace("{id}", &id.to_string())
                .replace("{label}", &label)
        } else {
            // Drop the id segment entirely, including the leading `#` and
            // trailing `_` of the default template shape
            self.template
                .replace("#{id}_", "")
                .replace("{id}", "")
                .replace("{label}", &label)
        }
    }
}
