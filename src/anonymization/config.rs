//! Analyzer, anonymizer, and audit configuration

use crate::anonymization::anonymizer::OperatorConfigs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Context hints applied to every scrub request
pub const DEFAULT_CONTEXT_HINTS: &[&str] = &[
    "full name",
    "name",
    "postcode",
    "birth",
    "account",
    "address",
    "actor",
    "actor name",
    "message",
];

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Language used when a request does not name one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Languages accepted by the entity extractor
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,

    /// Load the built-in recognizers
    #[serde(default = "default_true")]
    pub load_predefined: bool,

    /// Recognizer configuration file (`.json` or `.toml`)
    #[serde(default)]
    pub recognizers_path: Option<PathBuf>,

    /// Minimum final score for a detection to be kept
    #[serde(default)]
    pub score_threshold: f64,

    /// Per-request analysis timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Context hints added to every request
    #[serde(default = "default_context_hints")]
    pub context_hints: Vec<String>,

    /// Context boosting parameters
    #[serde(default)]
    pub context: ContextConfig,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_supported_languages() -> Vec<String> {
    vec![default_language()]
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_context_hints() -> Vec<String> {
    DEFAULT_CONTEXT_HINTS.iter().map(|h| h.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            supported_languages: default_supported_languages(),
            load_predefined: true,
            recognizers_path: None,
            score_threshold: 0.0,
            timeout_ms: default_timeout_ms(),
            context_hints: default_context_hints(),
            context: ContextConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_language.trim().is_empty() {
            anyhow::bail!("analyzer.default_language cannot be empty");
        }
        if self.supported_languages.is_empty() {
            anyhow::bail!("analyzer.supported_languages cannot be empty");
        }
        if !self
            .supported_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&self.default_language))
        {
            anyhow::bail!(
                "analyzer.default_language '{}' is not in supported_languages [{}]",
                self.default_language,
                self.supported_languages.join(", ")
            );
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            anyhow::bail!(
                "analyzer.score_threshold must be between 0.0 and 1.0, got {}",
                self.score_threshold
            );
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("analyzer.timeout_ms must be greater than 0");
        }

        if let Some(ref path) = self.recognizers_path {
            if !path.exists() {
                anyhow::bail!("Recognizer file not found: {}", path.display());
            }
            match path.extension().and_then(|s| s.to_str()) {
                Some("json") | Some("toml") => {}
                _ => anyhow::bail!(
                    "Recognizer file must be a .json or .toml file: {}",
                    path.display()
                ),
            }
        }

        self.context
            .validate()
            .context("Invalid analyzer.context configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SCRUB_RECOGNIZERS_PATH") {
            self.recognizers_path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SCRUB_DEFAULT_LANGUAGE") {
            self.default_language = val;
        }

        if let Ok(val) = std::env::var("SCRUB_SCORE_THRESHOLD") {
            self.score_threshold = val
                .parse()
                .context("Invalid SCRUB_SCORE_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("SCRUB_ANALYZER_TIMEOUT_MS") {
            self.timeout_ms = val
                .parse()
                .context("Invalid SCRUB_ANALYZER_TIMEOUT_MS value")?;
        }

        Ok(())
    }
}

/// Context boosting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Words before a match searched for context keywords
    #[serde(default = "default_prefix_words")]
    pub prefix_words: usize,

    /// Words after a match searched for context keywords
    #[serde(default)]
    pub suffix_words: usize,

    /// Score increment when a keyword is found
    #[serde(default = "default_similarity_factor")]
    pub similarity_factor: f64,

    /// Floor for boosted scores
    #[serde(default = "default_min_score_with_context")]
    pub min_score_with_context: f64,
}

fn default_prefix_words() -> usize {
    5
}

fn default_similarity_factor() -> f64 {
    0.35
}

fn default_min_score_with_context() -> f64 {
    0.4
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            prefix_words: default_prefix_words(),
            suffix_words: 0,
            similarity_factor: default_similarity_factor(),
            min_score_with_context: default_min_score_with_context(),
        }
    }
}

impl ContextConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_factor) {
            anyhow::bail!(
                "similarity_factor must be between 0.0 and 1.0, got {}",
                self.similarity_factor
            );
        }
        if !(0.0..=1.0).contains(&self.min_score_with_context) {
            anyhow::bail!(
                "min_score_with_context must be between 0.0 and 1.0, got {}",
                self.min_score_with_context
            );
        }
        Ok(())
    }
}

/// Anonymizer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Operators keyed by entity label
    #[serde(default)]
    pub operators: OperatorConfigs,
}

impl AnonymizerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.operators
            .validate()
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_true")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/scrubber.log")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!(
                            "Failed to create audit log directory: {}",
                            parent.display()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SCRUB_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid SCRUB_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("SCRUB_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        Ok(())
    }
}
