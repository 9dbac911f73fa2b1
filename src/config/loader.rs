//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScrubberConfig;
use super::secret::secret_string;
use crate::domain::{Result, ScrubError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScrubberConfig
/// 4. Applies environment variable overrides (SCRUB_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ScrubError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is not set, an override has an
/// invalid value, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use scrubber::config::load_config;
///
/// let config = load_config("scrubber.toml")?;
/// println!("Listening on {}", config.server.bind_address());
/// # Ok::<(), scrubber::domain::ScrubError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScrubberConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScrubError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScrubError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ScrubberConfig = toml::from_str(&contents)
        .map_err(|e| ScrubError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration from a file when given, otherwise from defaults
///
/// Environment overrides and validation apply in both cases, so a
/// deployment can be configured entirely through `SCRUB_*` variables.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ScrubberConfig> {
    match path {
        Some(path) => load_config(path),
        None => finish(ScrubberConfig::default()),
    }
}

fn finish(mut config: ScrubberConfig) -> Result<ScrubberConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ScrubError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScrubError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ScrubError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SCRUB_* prefix
fn apply_env_overrides(config: &mut ScrubberConfig) -> Result<()> {
    if let Ok(val) = std::env::var("SCRUB_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("SCRUB_API_KEY") {
        config.server.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SCRUB_SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("SCRUB_SERVER_PORT") {
        config.server.port = val.parse().map_err(|_| {
            ScrubError::Configuration(format!("Invalid SCRUB_SERVER_PORT value: {val}"))
        })?;
    }

    config
        .analyzer
        .apply_env_overrides()
        .map_err(|e| ScrubError::Configuration(format!("{e:#}")))?;
    config
        .audit
        .apply_env_overrides()
        .map_err(|e| ScrubError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Ok(val) = std::env::var("SCRUB_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().map_err(|_| {
            ScrubError::Configuration(format!("Invalid SCRUB_LOGGING_LOCAL_ENABLED value: {val}"))
        })?;
    }
    if let Ok(val) = std::env::var("SCRUB_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SCRUB_LOADER_TEST_VAR", "test_value");
        let input = "api_key = \"${SCRUB_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
        std::env::remove_var("SCRUB_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SCRUB_LOADER_MISSING_VAR");
        let input = "api_key = \"${SCRUB_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("SCRUB_LOADER_COMMENTED_VAR");
        let input = "# api_key = \"${SCRUB_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "info"

[server]
host = "127.0.0.1"

[analyzer]
score_threshold = 0.2
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.analyzer.score_threshold, 0.2);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[server\nport = ").unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_load_config_validation_failure() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[analyzer]\ndefault_language = \"fr\"\n")
            .unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.analyzer.supported_languages, vec!["en"]);
    }
}
