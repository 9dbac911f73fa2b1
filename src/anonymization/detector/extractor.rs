//! Statistical entity extraction capability
//!
//! The analyzer treats named-entity extraction as a pluggable capability: given
//! a text and a language it yields candidate spans. Model-backed
//! implementations live outside this crate; [`NoopExtractor`] is the built-in
//! implementation and only enforces the configured language list.

use thiserror::Error;

/// Candidate span proposed by an entity extractor
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCandidate {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Entity label, e.g. `PERSON`
    pub label: String,
    /// Model confidence
    pub score: f64,
}

impl EntityCandidate {
    /// Create a new candidate
    pub fn new(label: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            score,
        }
    }
}

/// Entity extractor failures
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The extractor has no model for the language
    #[error("No entity extraction model for language '{0}'")]
    UnsupportedLanguage(String),

    /// Inference failed
    #[error("Entity extraction failed: {0}")]
    Inference(String),
}

/// Trait for statistical entity extractors
pub trait EntityExtractor: Send + Sync {
    /// Extractor name recorded on detections
    fn name(&self) -> &str;

    /// Language codes the extractor accepts
    fn supported_languages(&self) -> &[String];

    /// Extract candidate spans from a text
    fn extract(&self, text: &str, language: &str)
        -> Result<Vec<EntityCandidate>, ExtractorError>;

    /// Check whether a language is accepted
    fn supports(&self, language: &str) -> bool {
        self.supported_languages()
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }
}

/// Extractor that proposes no candidates
///
/// Used when no statistical model is deployed. Languages outside the
/// configured list still fail, so requests for unconfigured languages behave
/// the same as with a model-backed extractor.
#[derive(Debug, Clone)]
pub struct NoopExtractor {
    languages: Vec<String>,
}

impl NoopExtractor {
    /// Create a new extractor for the given languages
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for NoopExtractor {
    fn default() -> Self {
        Self::new(["en"])
    }
}

impl EntityExtractor for NoopExtractor {
    fn name(&self) -> &str {
        "noop_extractor"
    }

    fn supported_languages(&self) -> &[String] {
        &self.languages
    }

    fn extract(
        &self,
        _text: &str,
        language: &str,
    ) -> Result<Vec<EntityCandidate>, ExtractorError> {
        if !self.supports(language) {
            return Err(ExtractorError::UnsupportedLanguage(language.to_string()));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_extractor_supported_language() {
        let extractor = NoopExtractor::default();
        let candidates = extractor.extract("John lives here", "en").unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_noop_extractor_language_is_case_insensitive() {
        let extractor = NoopExtractor::new(["en", "de"]);
        assert!(extractor.supports("EN"));
        assert!(extractor.supports("de"));
        assert!(!extractor.supports("fr"));
    }

    #[test]
    fn test_noop_extractor_unsupported_language() {
        let extractor = NoopExtractor::default();
        let result = extractor.extract("Bonjour", "fr");
        assert!(matches!(
            result,
            Err(ExtractorError::UnsupportedLanguage(ref l)) if l == "fr"
        ));
    }
}
