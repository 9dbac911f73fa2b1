//! Domain error types
//!
//! The detection and redaction core reports exactly three kinds of failure.
//! Transport and authorization failures live in the service layer
//! ([`crate::server::ApiError`]) and never appear here.

use thiserror::Error;

/// Main scrubber error type
///
/// Every fallible operation of the analyzer, the anonymizer, the recognizer
/// registry and the configuration loader returns this type.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Malformed recognizer definition, invalid configuration value,
    /// or a missing redaction operator
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure of the entity extractor or of a recognizer's rule evaluation
    #[error("Analysis error for language '{language}': {cause}")]
    Analysis { language: String, cause: String },

    /// Detections handed to the anonymizer overlap or do not fit the text
    #[error("Invalid detections: {0}")]
    Overlap(String),
}

impl ScrubError {
    /// Creates an analysis error for a language
    pub fn analysis(language: impl Into<String>, cause: impl ToString) -> Self {
        Self::Analysis {
            language: language.into(),
            cause: cause.to_string(),
        }
    }

    /// Stable classification used by the service error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_error",
            Self::Analysis { .. } => "analysis_error",
            Self::Overlap(_) => "overlap_error",
        }
    }
}

// I/O only happens while reading configuration or recognizer files
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Configuration(format!("I/O error: {err}"))
    }
}

impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Configuration(format!("JSON parse error: {err}"))
    }
}

impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}
