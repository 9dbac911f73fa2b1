//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the scrubber using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrubber - PII detection and redaction
#[derive(Parser, Debug)]
#[command(name = "scrubber")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(short, long, env = "SCRUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides `application.log_level`
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(commands::serve::ServeArgs),

    /// Redact a text and print the result
    Scrub(commands::scrub::ScrubArgs),

    /// Validate configuration and recognizer files
    ValidateConfig(commands::validate::ValidateArgs),
}
