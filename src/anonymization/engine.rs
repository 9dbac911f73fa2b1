//! Scrub engine
//!
//! [`ScrubEngine`] composes the analyzer and the anonymizer for one request.
//! Building it is the explicit initialization step of the process: the
//! recognizer registry is populated, validated, and frozen behind an `Arc`
//! before the first request, then shared read-only.
//!
//! # Examples
//!
//! ```
//! use scrubber::anonymization::ScrubEngine;
//! use scrubber::config::ScrubberConfig;
//!
//! let engine = ScrubEngine::from_config(&ScrubberConfig::default())?;
//! let scrubbed = engine.scrub("Email me at jane@example.com", "en")?;
//! assert_eq!(scrubbed, "Email me at <REDACTED>");
//! # Ok::<(), scrubber::domain::ScrubError>(())
//! ```

use crate::anonymization::{
    analyzer::AnalyzerEngine,
    anonymizer::{AnonymizerEngine, OperatorConfig, OperatorConfigs},
    audit::AuditLogger,
    detector::{load_definitions, ContextEnhancer, EntityExtractor, NoopExtractor, RecognizerRegistry},
    models::{Detection, ScrubOutcome},
};
use crate::config::ScrubberConfig;
use crate::domain::{Result, ScrubError};
use std::sync::Arc;
use std::time::Instant;

pub use crate::anonymization::anonymizer::REDACTION_LITERAL;
pub use crate::anonymization::config::DEFAULT_CONTEXT_HINTS;

/// Detection and redaction pipeline
///
/// Thread-safe; share it across tasks with `Arc`.
pub struct ScrubEngine {
    analyzer: AnalyzerEngine,
    anonymizer: AnonymizerEngine,
    operators: OperatorConfigs,
    context_hints: Vec<String>,
    default_language: String,
    audit_logger: Option<AuditLogger>,
}

impl std::fmt::Debug for ScrubEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrubEngine")
            .field("analyzer", &self.analyzer)
            .field("operators", &self.operators.len())
            .field("default_language", &self.default_language)
            .field("audit", &self.audit_logger.is_some())
            .finish()
    }
}

impl ScrubEngine {
    /// Build the engine from configuration with the default entity extractor
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::Configuration`] if a recognizer definition is
    /// invalid, the recognizer file cannot be loaded, an operator is invalid,
    /// or the audit log cannot be prepared.
    pub fn from_config(config: &ScrubberConfig) -> Result<Self> {
        let extractor = NoopExtractor::new(config.analyzer.supported_languages.iter().cloned());
        Self::with_extractor(config, Arc::new(extractor))
    }

    /// Build the engine from configuration with a specific entity extractor
    pub fn with_extractor(
        config: &ScrubberConfig,
        extractor: Arc<dyn EntityExtractor>,
    ) -> Result<Self> {
        let mut registry = RecognizerRegistry::new();
        if config.analyzer.load_predefined {
            registry.load_predefined()?;
        }
        if let Some(ref path) = config.analyzer.recognizers_path {
            let definitions = load_definitions(path)?;
            let count = registry.register_all(definitions)?;
            tracing::info!(
                path = %path.display(),
                recognizers = count,
                "Loaded custom recognizers"
            );
        }

        let mut operators = config.anonymizer.operators.clone();
        operators.ensure_default(OperatorConfig::replace(REDACTION_LITERAL));
        operators.validate()?;

        let audit_logger = if config.audit.enabled {
            Some(
                AuditLogger::new(config.audit.log_path.clone(), config.audit.json_format)
                    .map_err(|e| ScrubError::Configuration(format!("{e:#}")))?,
            )
        } else {
            None
        };

        let analyzer = AnalyzerEngine::new(Arc::new(registry), extractor)
            .with_context_enhancer(ContextEnhancer::from(&config.analyzer.context))
            .with_score_threshold(config.analyzer.score_threshold);

        let engine = Self {
            analyzer,
            anonymizer: AnonymizerEngine::new(),
            operators,
            context_hints: config.analyzer.context_hints.clone(),
            default_language: config.analyzer.default_language.clone(),
            audit_logger,
        };

        tracing::info!(
            recognizers = engine.analyzer.registry().len(),
            custom_recognizers = engine.analyzer.registry().custom_count(),
            languages = ?engine.analyzer.supported_languages(),
            operators = engine.operators.len(),
            audit = engine.audit_logger.is_some(),
            "Scrub engine ready"
        );

        Ok(engine)
    }

    /// Assemble an engine from parts
    pub fn new(analyzer: AnalyzerEngine, operators: OperatorConfigs) -> Self {
        Self {
            analyzer,
            anonymizer: AnonymizerEngine::new(),
            operators,
            context_hints: DEFAULT_CONTEXT_HINTS.iter().map(|h| h.to_string()).collect(),
            default_language: "en".to_string(),
            audit_logger: None,
        }
    }

    /// Language used when a request does not name one
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// The analyzer used by this engine
    pub fn analyzer(&self) -> &AnalyzerEngine {
        &self.analyzer
    }

    /// Redact PII from a text
    pub fn scrub(&self, text: &str, language: &str) -> Result<String> {
        const NO_HINTS: &[&str] = &[];
        Ok(self.scrub_with_context(text, language, NO_HINTS)?.text)
    }

    /// Redact PII from a text using extra context hints
    ///
    /// Returns the redacted text together with the detections, the applied
    /// replacements, and timing. Either the whole text is redacted or an
    /// error is returned.
    pub fn scrub_with_context<S: AsRef<str>>(
        &self,
        text: &str,
        language: &str,
        extra_hints: &[S],
    ) -> Result<ScrubOutcome> {
        let started = Instant::now();

        let detections = self.analyze(text, language, extra_hints)?;
        let result = self
            .anonymizer
            .anonymize(text, &detections, &self.operators)?;

        let outcome = ScrubOutcome::new(
            result,
            language.to_string(),
            detections,
            started.elapsed().as_millis() as u64,
        );

        if let Some(ref logger) = self.audit_logger {
            if let Err(e) = logger.log_scrub(text, &outcome) {
                tracing::error!(error = %format!("{e:#}"), "Failed to write audit entry");
            }
        }

        crate::log_scrub_complete!(outcome.total_detections(), outcome.processing_time_ms);
        Ok(outcome)
    }

    /// Detect PII without redacting
    pub fn analyze<S: AsRef<str>>(
        &self,
        text: &str,
        language: &str,
        extra_hints: &[S],
    ) -> Result<Vec<Detection>> {
        let hints: Vec<&str> = self
            .context_hints
            .iter()
            .map(String::as_str)
            .chain(extra_hints.iter().map(AsRef::as_ref))
            .collect();

        self.analyzer.analyze(text, language, &hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::{RecognizerDefinition, Rule};
    use std::io::Write;

    const RECOGNIZERS: &str = r#"{
        "POSTCODE": {
            "pattern": {"name": "uk_postcode", "regex": "\\b[A-Z]{1,2}\\d[A-Z\\d]? ?\\d[A-Z]{2}\\b", "score": 0.6},
            "context": ["postcode", "address"]
        },
        "ACCOUNT_NUMBER": {
            "pattern": {"name": "six_digits", "regex": "\\b\\d{6}\\b", "score": 0.4},
            "context": ["account"]
        }
    }"#;

    fn engine_with_recognizers() -> (ScrubEngine, tempfile::NamedTempFile) {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(RECOGNIZERS.as_bytes()).unwrap();
        file.flush().unwrap();

        let mut config = ScrubberConfig::default();
        config.analyzer.recognizers_path = Some(file.path().to_path_buf());
        (ScrubEngine::from_config(&config).unwrap(), file)
    }

    #[test]
    fn test_engine_creation() {
        let engine = ScrubEngine::from_config(&ScrubberConfig::default());
        assert!(engine.is_ok());
    }

    #[test]
    fn test_scrub_postcode_and_account() {
        let (engine, _file) = engine_with_recognizers();
        let scrubbed = engine
            .scrub("My postcode is SW1A 1AA and account 123456.", "en")
            .unwrap();
        assert_eq!(scrubbed, "My postcode is <REDACTED> and account <REDACTED>.");
    }

    #[test]
    fn test_scrub_is_idempotent() {
        let (engine, _file) = engine_with_recognizers();
        let once = engine
            .scrub("Call 020 7946 0958 about SW1A 1AA", "en")
            .unwrap();
        let twice = engine.scrub(&once, "en").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scrub_with_context_outcome() {
        let (engine, _file) = engine_with_recognizers();
        let text = "account: 123456";
        let outcome = engine.scrub_with_context(text, "en", &["member"]).unwrap();

        assert_eq!(outcome.text, "account: <REDACTED>");
        assert_eq!(outcome.total_detections(), 1);
        assert_eq!(outcome.detections[0].entity_label, "ACCOUNT_NUMBER");
        assert!(outcome.detections[0].score > 0.4);
        assert_eq!(outcome.items[0].start, 9);
        assert_eq!(outcome.stats_by_label.get("ACCOUNT_NUMBER"), Some(&1));
    }

    #[test]
    fn test_unsupported_language_fails_whole_request() {
        let engine = ScrubEngine::from_config(&ScrubberConfig::default()).unwrap();
        let result = engine.scrub("jane@example.com", "fr");
        assert!(matches!(result, Err(ScrubError::Analysis { .. })));
    }

    #[test]
    fn test_invalid_recognizer_file_fails_startup() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"BROKEN": {"pattern": {"regex": "(", "score": 0.5}}}"#)
            .unwrap();
        file.flush().unwrap();

        let mut config = ScrubberConfig::default();
        config.analyzer.recognizers_path = Some(file.path().to_path_buf());

        let result = ScrubEngine::from_config(&config);
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_configured_operator_is_used() {
        let mut config = ScrubberConfig::default();
        config.anonymizer.operators =
            OperatorConfigs::empty().with("EMAIL_ADDRESS", OperatorConfig::Remove);

        let engine = ScrubEngine::from_config(&config).unwrap();
        let scrubbed = engine
            .scrub("mail jane@example.com or 192.168.0.1", "en")
            .unwrap();

        // EMAIL_ADDRESS is removed; the default fallback still redacts the rest
        assert_eq!(scrubbed, "mail  or <REDACTED>");
    }

    #[test]
    fn test_engine_from_parts() {
        let mut registry = RecognizerRegistry::new();
        registry
            .register(RecognizerDefinition::new(
                "TICKET",
                vec![Rule::new("ticket", r"\bTCK-\d{4}\b", 0.7)],
            ))
            .unwrap();
        let analyzer =
            AnalyzerEngine::new(Arc::new(registry), Arc::new(NoopExtractor::default()));
        let engine = ScrubEngine::new(analyzer, OperatorConfigs::default());

        assert_eq!(
            engine.scrub("see TCK-1234", "en").unwrap(),
            "see <REDACTED>"
        );
    }

    #[test]
    fn test_audit_log_written() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let mut config = ScrubberConfig::default();
        config.audit.enabled = true;
        config.audit.log_path = log_path.clone();

        let engine = ScrubEngine::from_config(&config).unwrap();
        engine.scrub("mail jane@example.com", "en").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("EMAIL_ADDRESS"));
        assert!(!content.contains("jane@example.com"));
    }

    #[test]
    fn test_audit_disabled_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let mut config = ScrubberConfig::default();
        config.audit.log_path = log_path.clone();

        let engine = ScrubEngine::from_config(&config).unwrap();
        engine.scrub("mail jane@example.com", "en").unwrap();

        assert!(!log_path.exists());
    }
}
