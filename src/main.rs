use clap::Parser;
use scrubber::cli::{Cli, Commands};
use scrubber::config::{load_config_or_default, LoggingConfig, ScrubberConfig};
use scrubber::domain::Result;
use scrubber::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config_or_default(cli.config.as_deref());

    // File logging is only enabled once the configuration loaded
    let (config_level, logging_config) = match config {
        Ok(ref c) => (c.application.log_level.clone(), c.logging.clone()),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Scrubber starting");

    let exit_code = match execute_command(&cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Result<ScrubberConfig>) -> anyhow::Result<i32> {
    if let Commands::ValidateConfig(args) = &cli.command {
        return args.execute(cli.config.as_deref(), config).await;
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to load configuration");
            eprintln!("   Error: {e}");
            return Ok(2);
        }
    };

    match &cli.command {
        Commands::Serve(args) => args.execute(config).await,
        Commands::Scrub(args) => args.execute(config).await,
        Commands::ValidateConfig(_) => Ok(0),
    }
}
