//! Synthetic and user-data replacement

use crate::anonymize::{
    generator::ValueGenerator, in_document_order, rewrite, AnonymizedText, AppliedReplacement,
};
use crate::entity::Entity;
use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// User-supplied replacement values, keyed by label
pub type UserData = HashMap<String, Vec<String>>;

/// Replaces entities with realistic substitute values
///
/// Values come from user-supplied per-label lists where available (drawn in
/// order, cycling on exhaustion unless cycling is disabled) and from the
/// synthetic-value generator otherwise. With consistency enabled, identical
/// `(label, original)` pairs reuse the first-assigned replacement for the
/// rest of the call.
pub struct Replacer {
    generator: Arc<dyn ValueGenerator>,
    ensure_consistency: bool,
    cycle_user_data: bool,
}

impl Replacer {
    /// Create a replacer backed by the given generator
    pub fn new(generator: Arc<dyn ValueGenerator>, ensure_consistency: bool) -> Self {
        Self {
            generator,
            ensure_consistency,
            cycle_user_data: true,
        }
    }

    /// Disable cycling of user-supplied lists; exhaustion then becomes a
    /// configuration error
    pub fn without_cycling(mut self) -> Self {
        self.cycle_user_data = false;
        self
    }

    /// Replace `entities` in `text` using the generator only
    pub fn replace(&self, text: &str, entities: &[Entity]) -> Result<AnonymizedText> {
        self.run(text, entities, &UserData::new())
    }

    /// Replace `entities` in `text`, preferring user-supplied values
    pub fn replace_with_data(
        &self,
        text: &str,
        entities: &[Entity],
        user_data: &UserData,
    ) -> Result<AnonymizedText> {
        self.run(text, entities, user_data)
    }

    fn run(&self, text: &str, entities: &[Entity], user_data: &UserData) -> Result<AnonymizedText> {
        let ordered = in_document_order(entities);

        let mut consistent: HashMap<(&str, &str), String> = HashMap::new();
        let mut cursors: HashMap<&str, usize> = HashMap::new();
        let mut plan = Vec::with_capacity(ordered.len());
        let mut reverse_map = HashMap::new();

        for entity in ordered {
            let key = (entity.label.as_str(), entity.text.as_str());
            let cached = self
                .ensure_consistency
                .then(|| consistent.get(&key).cloned())
                .flatten();
            let replacement = match cached {
                Some(value) => value,
                None => {
                    let value = self.next_value(&entity.label, user_data, &mut cursors)?;
                    if self.ensure_consistency {
                        consistent.insert(key, value.clone());
                    }
                    value
                }
            };

            reverse_map.insert(replacement.clone(), entity.text.clone());
            plan.push(AppliedReplacement {
                label: entity.label.clone(),
                original: entity.text.clone(),
                replacement,
                start: entity.start,
                end: entity.end,
            });
        }

        Ok(AnonymizedText {
            text: rewrite(text, &plan),
            reverse_map,
            replacements: plan,
        })
    }

    fn next_value<'d>(
        &self,
        label: &'d str,
        user_data: &'d UserData,
        cursors: &mut HashMap<&'d str, usize>,
    ) -> Result<String> {
        let values = match user_data.get(label) {
            Some(values) => values,
            None => return Ok(self.generator.generate(label)),
        };
        if values.is_empty() {
            return Err(CoreError::ReplacementExhausted {
                label: label.to_string(),
            });
        }

        let cursor = cursors.entry(label).or_insert(0);
        if *cursor >= values.len() && !self.cycle_user_data {
            return Err(CoreError::ReplacementExhausted {
                label: label.to_string(),
            });
        }
        let value = values[*cursor % values.len()].clone();
        *cursor += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Deterministic generator: value-0, value-1, ...
    struct Sequence(Mutex<usize>);

    impl Sequence {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(0)))
        }
    }

    impl ValueGenerator for Sequence {
        fn generate(&self, label: &str) -> String {
            let mut n = self.0.lock().unwrap();
            *n += 1;
            format!("{}-{}", label, *n - 1)
        }
    }

    fn entity(start: usize, end: usize, text: &str, label: &str) -> Entity {
        Entity {
            start,
            end,
            text: text.to_string(),
            label: label.to_string(),
            confidence: 0.9,
            source_pass: 0,
        }
    }

    #[test]
    fn consistency_reuses_first_replacement() {
        let text = "John and John work together";
        let replacer = Replacer::new(Sequence::new(), true);
        let out = replacer
            .replace(
                text,
                &[entity(0, 4, "John", "person"), entity(9, 13, "John", "person")],
            )
            .unwrap();
        assert_eq!(out.text, "person-0 and person-0 work together");
    }

    #[test]
    fn without_consistency_each_occurrence_draws_fresh() {
        let text = "John and John";
        let replacer = Replacer::new(Sequence::new(), false);
        let out = replacer
            .replace(
                text,
                &[entity(0, 4, "John", "person"), entity(9, 13, "John", "person")],
            )
            .unwrap();
        assert_eq!(out.text, "person-0 and person-1");
    }

    #[test]
    fn user_data_is_preferred_and_cycles() {
        let text = "a b c";
        let mut user_data = UserData::new();
        user_data.insert(
            "code".to_string(),
            vec!["x".to_string(), "y".to_string()],
        );
        // Distinct originals so consistency does not short-circuit the list
        let replacer = Replacer::new(Sequence::new(), true);
        let out = replacer
            .replace_with_data(
                text,
                &[
                    entity(0, 1, "a", "code"),
                    entity(2, 3, "b", "code"),
                    entity(4, 5, "c", "code"),
                ],
                &user_data,
            )
            .unwrap();
        assert_eq!(out.text, "x y x");
    }

    #[test]
    fn exhaustion_without_cycling_is_an_error() {
        let text = "a b";
        let mut user_data = UserData::new();
        user_data.insert("code".to_string(), vec!["x".to_string()]);
        let replacer = Replacer::new(Sequence::new(), true).without_cycling();
        let err = replacer
            .replace_with_data(
                text,
                &[entity(0, 1, "a", "code"), entity(2, 3, "b", "code")],
                &user_data,
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::ReplacementExhausted { .. }));
    }

    #[test]
    fn labels_without_user_data_fall_back_to_generator() {
        let text = "Alice at Acme";
        let mut user_data = UserData::new();
        user_data.insert("person".to_string(), vec!["Jane Doe".to_string()]);
        let replacer = Replacer::new(Sequence::new(), true);
        let out = replacer
            .replace_with_data(
                text,
                &[
                    entity(0, 5, "Alice", "person"),
                    entity(9, 13, "Acme", "company"),
                ],
                &user_data,
            )
            .unwrap();
        assert_eq!(out.text, "Jane Doe at company-0");
    }

    #[test]
    fn reverse_map_points_back_to_originals() {
        let text = "John met Mary";
        let replacer = Replacer::new(Sequence::new(), true);
        let out = replacer
            .replace(
                text,
                &[entity(0, 4, "John", "person"), entity(9, 13, "Mary", "person")],
            )
            .unwrap();
        assert_eq!(out.reverse_map["person-0"], "John");
        assert_eq!(out.reverse_map["person-1"], "Mary");
    }

    #[test]
    fn no_entities_returns_text_unchanged() {
        let replacer = Replacer::new(Sequence::new(), true);
        let out = replacer.replace("plain text", &[]).unwrap();
        assert_eq!(out.text, "plain text");
        assert!(out.reverse_map.is_empty());
    }
}
