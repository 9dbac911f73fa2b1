//! Validate config command implementation
//!
//! This module implements the `validate-config` command: it loads the
//! configuration, builds the recognizer registry and the operators, and
//! reports a summary.

use crate::anonymization::ScrubEngine;
use crate::config::ScrubberConfig;
use crate::domain::Result;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        config: Result<ScrubberConfig>,
    ) -> anyhow::Result<i32> {
        let source = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<defaults>".to_string());
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();

        let config = match config {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let engine = match ScrubEngine::from_config(&config) {
            Ok(engine) => {
                println!("✅ Recognizers and operators are valid");
                engine
            }
            Err(e) => {
                println!("❌ Recognizer or operator validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let registry = engine.analyzer().registry();
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!(
            "  API Key: {}",
            if config.server.api_key.is_some() {
                "configured"
            } else {
                "missing (required by serve)"
            }
        );
        println!("  Default Language: {}", config.analyzer.default_language);
        println!(
            "  Supported Languages: {}",
            config.analyzer.supported_languages.join(", ")
        );
        println!(
            "  Recognizers: {} ({} custom)",
            registry.len(),
            registry.custom_count()
        );
        println!(
            "  Entity Labels ({}): {}",
            config.analyzer.default_language,
            registry
                .supported_entities(&config.analyzer.default_language)
                .join(", ")
        );
        println!("  Score Threshold: {}", config.analyzer.score_threshold);
        println!("  Operators: {}", config.anonymizer.operators.len());
        println!("  Audit Log: {}", config.audit.enabled);
        println!();

        Ok(0)
    }
}
