//! Analyzer engine
//!
//! Runs the entity extractor and every pattern recognizer registered for a
//! language, boosts pattern candidates with context keywords, and reconciles
//! the pooled candidates into a disjoint set of detections.

use crate::anonymization::detector::{
    ContextEnhancer, ContextKeyword, EntityCandidate, EntityExtractor, RecognizerRegistry,
    TextWords,
};
use crate::anonymization::models::{Detection, DetectionMethod};
use crate::domain::{Result, ScrubError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Detects PII spans in a text
#[derive(Clone)]
pub struct AnalyzerEngine {
    registry: Arc<RecognizerRegistry>,
    extractor: Arc<dyn EntityExtractor>,
    enhancer: ContextEnhancer,
    score_threshold: f64,
}

impl std::fmt::Debug for AnalyzerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerEngine")
            .field("recognizers", &self.registry.len())
            .field("extractor", &self.extractor.name())
            .field("enhancer", &self.enhancer)
            .field("score_threshold", &self.score_threshold)
            .finish()
    }
}

impl AnalyzerEngine {
    /// Create an analyzer over a frozen registry
    pub fn new(registry: Arc<RecognizerRegistry>, extractor: Arc<dyn EntityExtractor>) -> Self {
        Self {
            registry,
            extractor,
            enhancer: ContextEnhancer::default(),
            score_threshold: 0.0,
        }
    }

    /// Set the context enhancer
    pub fn with_context_enhancer(mut self, enhancer: ContextEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    /// Set the minimum final score; detections scoring below it are dropped
    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold.clamp(0.0, 1.0);
        self
    }

    /// The registry the analyzer reads from
    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Languages accepted by the entity extractor
    pub fn supported_languages(&self) -> &[String] {
        self.extractor.supported_languages()
    }

    /// Analyze a text
    ///
    /// `context_hints` are added to every recognizer's own context keywords.
    /// The result is disjoint and sorted by start offset. Any failure fails
    /// the whole call; partial results are never returned.
    pub fn analyze<S: AsRef<str>>(
        &self,
        text: &str,
        language: &str,
        context_hints: &[S],
    ) -> Result<Vec<Detection>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();

        let raw = self
            .extractor
            .extract(text, language)
            .map_err(|e| ScrubError::analysis(language, e))?;
        let mut candidates = raw
            .into_iter()
            .map(|candidate| self.extractor_detection(text, language, candidate))
            .collect::<Result<Vec<_>>>()?;
        let extracted = candidates.len();

        let recognizers = self.registry.recognizers_for(language);
        if !recognizers.is_empty() {
            let hints = ContextKeyword::parse_all(context_hints);
            let words = TextWords::new(text);

            for recognizer in recognizers {
                let found = recognizer.analyze(text).map_err(|e| {
                    ScrubError::analysis(
                        language,
                        format!("recognizer {} failed: {e}", recognizer.name()),
                    )
                })?;

                for mut detection in found {
                    self.enhancer.enhance(
                        &words,
                        &mut detection,
                        recognizer.context().iter().chain(hints.iter()),
                    );
                    candidates.push(detection);
                }
            }
        }

        let pooled = candidates.len();
        candidates.retain(|d| d.score >= self.score_threshold);
        let detections = resolve_overlaps(candidates);

        tracing::debug!(
            language = %language,
            extracted,
            pooled,
            accepted = detections.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Analysis complete"
        );

        Ok(detections)
    }

    fn extractor_detection(
        &self,
        text: &str,
        language: &str,
        candidate: EntityCandidate,
    ) -> Result<Detection> {
        let in_bounds = candidate.start < candidate.end
            && candidate.end <= text.len()
            && text.is_char_boundary(candidate.start)
            && text.is_char_boundary(candidate.end);

        if !in_bounds || candidate.label.trim().is_empty() || !candidate.score.is_finite() {
            return Err(ScrubError::analysis(
                language,
                format!(
                    "extractor {} returned invalid candidate {} [{}, {})",
                    self.extractor.name(),
                    candidate.label,
                    candidate.start,
                    candidate.end
                ),
            ));
        }

        Ok(
            Detection::new(candidate.label, candidate.start, candidate.end, candidate.score)
                .produced_by(DetectionMethod::Ner, self.extractor.name()),
        )
    }
}

/// Reduce candidates to a disjoint set
///
/// Candidates are ranked by score, then span length, then start offset, and
/// accepted greedily when they overlap nothing accepted so far. This is a
/// deterministic greedy approximation, not an optimal selection. The result is
/// sorted by start offset.
///
/// Accepted spans are kept ordered by start, so each candidate is checked
/// against its two neighbours only.
pub fn resolve_overlaps(mut candidates: Vec<Detection>) -> Vec<Detection> {
    candidates.sort_by(|a, b| a.rank(b));

    let mut accepted: BTreeMap<usize, Detection> = BTreeMap::new();
    for candidate in candidates {
        let clashes_before = accepted
            .range(..=candidate.start)
            .next_back()
            .is_some_and(|(_, a)| a.start == candidate.start || a.overlaps(&candidate));
        let clashes_after = accepted
            .range(candidate.start..)
            .next()
            .is_some_and(|(_, a)| a.overlaps(&candidate));

        if !clashes_before && !clashes_after {
            accepted.insert(candidate.start, candidate);
        }
    }

    accepted.into_values().collect()
}
