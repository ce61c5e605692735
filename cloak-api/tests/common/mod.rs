//! Shared test fixtures

use cloak_api::{CoreError, Detection, Recognizer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Substring-gazetteer stand-in for the extraction model
///
/// Emits one detection per occurrence of each configured needle whose
/// confidence clears the requested threshold.
pub struct GazetteerModel {
    entries: Vec<(String, String, f32)>,
    calls: AtomicUsize,
}

impl GazetteerModel {
    pub fn new(entries: &[(&str, &str, f32)]) -> Arc<Self> {
        Arc::new(Self {
            entries: entries
                .iter()
                .map(|(needle, label, confidence)| {
                    (needle.to_string(), label.to_string(), *confidence)
                })
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Recognizer for GazetteerModel {
    fn extract(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<Detection>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut detections = Vec::new();
        for (needle, label, confidence) in &self.entries {
            if *confidence < threshold || !labels.contains(label) {
                continue;
            }
            for (pos, matched) in text.match_indices(needle.as_str()) {
                detections.push(Detection {
                    start: pos,
                    end: pos + matched.len(),
                    text: matched.to_string(),
                    label: label.clone(),
                    confidence: *confidence,
                });
            }
        }
        Ok(detections)
    }
}
