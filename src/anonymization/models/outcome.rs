//! Anonymizer and scrub result models

use super::detection::Detection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One replacement applied by the anonymizer
///
/// Offsets refer to the *output* text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorResult {
    /// Start of the replacement in the output text
    pub start: usize,
    /// End of the replacement in the output text
    pub end: usize,
    /// Entity label of the replaced detection
    pub entity_label: String,
    /// Operator name (`replace`, `mask`, `hash`, `remove`)
    pub operator: String,
}

/// Rewritten text plus the replacements that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizerResult {
    /// Redacted text
    pub text: String,
    /// Replacements sorted by output start
    pub items: Vec<OperatorResult>,
}

/// Result of one scrub request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubOutcome {
    /// Redacted text
    pub text: String,
    /// Language the text was analyzed as
    pub language: String,
    /// Accepted detections, sorted by start, offsets into the original text
    pub detections: Vec<Detection>,
    /// Replacements, offsets into the redacted text
    pub items: Vec<OperatorResult>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of the scrub
    pub timestamp: DateTime<Utc>,
    /// Detection counts by entity label
    pub stats_by_label: HashMap<String, usize>,
}

impl ScrubOutcome {
    /// Create a new scrub outcome
    pub fn new(
        result: AnonymizerResult,
        language: String,
        detections: Vec<Detection>,
        processing_time_ms: u64,
    ) -> Self {
        let mut stats_by_label = HashMap::new();
        for detection in &detections {
            *stats_by_label
                .entry(detection.entity_label.clone())
                .or_insert(0) += 1;
        }

        Self {
            text: result.text,
            language,
            detections,
            items: result.items,
            processing_time_ms,
            timestamp: Utc::now(),
            stats_by_label,
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}
