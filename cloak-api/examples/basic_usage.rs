//! Basic usage of the cloak pipeline with a toy dictionary model

use cloak_api::{Cloak, CoreError, Detection, Recognizer, UserData};

/// Dictionary-backed recognizer; a real deployment would wrap an NER model
struct DictionaryModel {
    entries: Vec<(&'static str, &'static str, f32)>,
}

impl Recognizer for DictionaryModel {
    fn extract(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<Detection>, CoreError> {
        let mut detections = Vec::new();
        for (needle, label, confidence) in &self.entries {
            if *confidence < threshold || !labels.iter().any(|l| l == label) {
                continue;
            }
            for (pos, matched) in text.match_indices(needle) {
                detections.push(Detection {
                    start: pos,
                    end: pos + matched.len(),
                    text: matched.to_string(),
                    label: label.to_string(),
                    confidence: *confidence,
                });
            }
        }
        Ok(detections)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = DictionaryModel {
        entries: vec![
            ("Alice", "person", 0.92),
            ("John", "person", 0.88),
            ("Paris", "location", 0.85),
        ],
    };
    let cloak = Cloak::builder().recognizer(model).build()?;
    let text = "Alice met John in Paris, and John flew home.";
    let labels = ["person", "location"];

    // Extraction
    println!("=== Extraction ===");
    let extraction = cloak.extract(text, &labels)?;
    for entity in &extraction.entities {
        println!(
            "  {:>8}  {:?}  {} ({:.2})",
            entity.label,
            (entity.start, entity.end),
            entity.text,
            entity.confidence
        );
    }
    println!(
        "  {} candidates, {} passes, {}ms\n",
        extraction.analytics.raw_candidates,
        extraction.analytics.passes_completed,
        extraction.analytics.processing_time_ms
    );

    // Numbered redaction
    println!("=== Redaction ===");
    let redacted = cloak.redact(text, &labels)?;
    println!("  {}", redacted.anonymized_text);
    for (placeholder, original) in &redacted.reverse_map {
        println!("  {placeholder} -> {original}");
    }

    // Synthetic replacement
    println!("\n=== Replacement ===");
    let replaced = cloak.replace(text, &labels)?;
    println!("  {}", replaced.anonymized_text);

    // User-supplied replacement data
    println!("\n=== Replacement with user data ===");
    let mut user_data = UserData::new();
    user_data.insert(
        "person".to_string(),
        vec!["Pat Doe".to_string(), "Sam Roe".to_string()],
    );
    let replaced = cloak.replace_with_data(text, &labels, &user_data)?;
    println!("  {}", replaced.anonymized_text);

    Ok(())
}
