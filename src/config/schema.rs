//! Configuration schema types

use crate::anonymization::config::{AnalyzerConfig, AnonymizerConfig, AuditConfig};
use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main scrubber configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubberConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Detection settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Redaction operators
    #[serde(default)]
    pub anonymizer: AnonymizerConfig,

    /// Audit log settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrubberConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.analyzer.validate().map_err(|e| format!("{e:#}"))?;
        self.anonymizer.validate().map_err(|e| format!("{e:#}"))?;
        self.audit.validate().map_err(|e| format!("{e:#}"))?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Expected value of the `x-api-key` header
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ScrubberConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert!(config.server.api_key.is_none());
        assert_eq!(config.analyzer.default_language, "en");
        assert!(!config.audit.enabled);
        assert!(!config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config: ScrubberConfig = toml::from_str(
            r#"
[application]
log_level = "DEBUG"

[server]
host = "127.0.0.1"
port = 9000
api_key = "secret-key"

[analyzer]
supported_languages = ["en", "de"]
score_threshold = 0.35

[analyzer.context]
prefix_words = 3

[anonymizer.operators.DEFAULT]
type = "replace"
new_value = "[X]"

[anonymizer.operators.CREDIT_CARD]
type = "mask"
keep_suffix = 4

[logging]
local_rotation = "hourly"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(
            config.server.api_key.as_ref().unwrap().expose_secret(),
            "secret-key"
        );
        assert_eq!(config.analyzer.context.prefix_words, 3);
        assert_eq!(config.anonymizer.operators.len(), 2);
        assert_eq!(config.logging.local_rotation, "hourly");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ScrubberConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port() {
        let mut config = ScrubberConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = ScrubberConfig::default();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let mut config = ScrubberConfig::default();
        config.server.api_key = Some(crate::config::secret_string("hunter2".to_string()));
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
