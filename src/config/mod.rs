//! Configuration management for the scrubber.
//!
//! # Overview
//!
//! The scrubber reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SCRUB_*` environment overrides applied after parsing
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Bind address and API key
//! - [`AnalyzerConfig`] - Languages, recognizer file, thresholds, context boosting
//! - [`AnonymizerConfig`] - Redaction operators per entity label
//! - [`AuditConfig`] - Audit log of scrub operations
//! - [`LoggingConfig`] - Local log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! port = 8000
//! api_key = "${SCRUB_API_KEY}"
//!
//! [analyzer]
//! recognizers_path = "recognizers.json"
//!
//! [anonymizer.operators.DEFAULT]
//! type = "replace"
//! new_value = "<REDACTED>"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use crate::anonymization::config::{
    AnalyzerConfig, AnonymizerConfig, AuditConfig, ContextConfig,
};
pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, LoggingConfig, ScrubberConfig, ServerConfig};
pub use secret::{secret_string, SecretString, SecretValue};
