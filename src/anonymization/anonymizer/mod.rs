//! Anonymizer engine and redaction operators
//!
//! The anonymizer rewrites a text given a set of disjoint detections. All
//! offset arithmetic is done against positions in the original text; the
//! output buffer only ever grows by appending, so replacements of any length
//! cannot shift later spans.

pub mod hashing;
pub mod masking;
pub mod operators;
pub mod redaction;

pub use hashing::{HashAlgorithm, HashOperator};
pub use masking::MaskOperator;
pub use operators::{OperatorConfig, OperatorConfigs, REDACTION_LITERAL};
pub use redaction::{RemoveOperator, ReplaceOperator};

use crate::anonymization::models::{AnonymizerResult, Detection, OperatorResult};
use crate::domain::{Result, ScrubError};

/// Trait for redaction operators
pub trait Operator: Send + Sync {
    /// Compute the replacement for a matched span
    fn operate(&self, original: &str, entity_label: &str) -> String;

    /// Operator name reported in anonymizer results
    fn name(&self) -> &'static str;
}

/// Applies operators to detections
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymizerEngine;

impl AnonymizerEngine {
    /// Create a new anonymizer engine
    pub fn new() -> Self {
        Self
    }

    /// Rewrite `text`, replacing every detection through its operator
    ///
    /// Detections may arrive in any order. They are validated before any
    /// output is produced: each span must lie inside the text on character
    /// boundaries, and no two spans may overlap. Violations are reported as
    /// [`ScrubError::Overlap`]; a missing operator is a configuration error.
    pub fn anonymize(
        &self,
        text: &str,
        detections: &[Detection],
        operators: &OperatorConfigs,
    ) -> Result<AnonymizerResult> {
        let mut ordered: Vec<&Detection> = detections.iter().collect();
        ordered.sort_by_key(|d| (d.start, d.end));

        validate_spans(text, &ordered)?;

        let resolved = ordered
            .iter()
            .map(|d| operators.resolve(&d.entity_label))
            .collect::<Result<Vec<_>>>()?;

        let mut output = String::with_capacity(text.len());
        let mut items = Vec::with_capacity(ordered.len());
        let mut cursor = 0;

        for (detection, operator) in ordered.iter().zip(resolved) {
            output.push_str(&text[cursor..detection.start]);

            let replacement =
                operator.operate(&text[detection.start..detection.end], &detection.entity_label);
            let start = output.len();
            output.push_str(&replacement);

            items.push(OperatorResult {
                start,
                end: output.len(),
                entity_label: detection.entity_label.clone(),
                operator: operator.name().to_string(),
            });
            cursor = detection.end;
        }
        output.push_str(&text[cursor..]);

        Ok(AnonymizerResult {
            text: output,
            items,
        })
    }
}

/// Check bounds, character boundaries, and disjointness of sorted detections
fn validate_spans(text: &str, ordered: &[&Detection]) -> Result<()> {
    for detection in ordered {
        if detection.start >= detection.end || detection.end > text.len() {
            return Err(ScrubError::Overlap(format!(
                "{} span [{}, {}) is empty or outside text of length {}",
                detection.entity_label,
                detection.start,
                detection.end,
                text.len()
            )));
        }
        if !text.is_char_boundary(detection.start) || !text.is_char_boundary(detection.end) {
            return Err(ScrubError::Overlap(format!(
                "{} span [{}, {}) does not fall on character boundaries",
                detection.entity_label, detection.start, detection.end
            )));
        }
    }

    for pair in ordered.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(ScrubError::Overlap(format!(
                "{} [{}, {}) overlaps {} [{}, {})",
                pair[0].entity_label,
                pair[0].start,
                pair[0].end,
                pair[1].entity_label,
                pair[1].start,
                pair[1].end
            )));
        }
    }

    Ok(())
}
