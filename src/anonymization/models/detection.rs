//! Detection data model

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How a detection was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Pattern recognizer (regex rule plus context keywords)
    Pattern,
    /// Statistical entity extractor
    Ner,
    /// Supplied by a caller rather than produced by the analyzer
    External,
}

impl Default for DetectionMethod {
    fn default() -> Self {
        Self::External
    }
}

/// A detected PII span
///
/// `start` and `end` are byte offsets into the analyzed UTF-8 text and always
/// fall on character boundaries for detections produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// PII category, e.g. `POSTCODE`
    pub entity_label: String,
    /// Confidence in [0.0, 1.0] after context boosting
    pub score: f64,
    /// Detection method used
    #[serde(default)]
    pub detection_method: DetectionMethod,
    /// Name of the recognizer or extractor that proposed the span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizer: Option<String>,
    /// Context keyword that boosted the score, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_keyword: Option<String>,
}

impl Detection {
    /// Create a new detection
    pub fn new(entity_label: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            start,
            end,
            entity_label: entity_label.into(),
            score: score.clamp(0.0, 1.0),
            detection_method: DetectionMethod::External,
            recognizer: None,
            context_keyword: None,
        }
    }

    /// Set the detection method and the name of the component that produced it
    pub fn produced_by(mut self, method: DetectionMethod, recognizer: impl Into<String>) -> Self {
        self.detection_method = method;
        self.recognizer = Some(recognizer.into());
        self
    }

    /// Set the confidence score
    pub fn set_score(&mut self, score: f64) {
        self.score = score.clamp(0.0, 1.0);
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether two half-open spans share at least one position
    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Ranking used by overlap resolution: higher score first, then the longer
    /// span, then the earlier start
    pub fn rank(&self, other: &Detection) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.len().cmp(&self.len()))
            .then_with(|| self.start.cmp(&other.start))
    }
}
