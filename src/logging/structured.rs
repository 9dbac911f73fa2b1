//! Subscriber setup
//!
//! Events always go to stderr so `scrubber scrub` can keep stdout for the
//! redacted text. With `logging.local_enabled` the same events are also
//! written as JSON lines to `<local_path>/scrubber.log`, rotated by
//! `local_rotation`.

use crate::config::LoggingConfig;
use crate::domain::{Result, ScrubError};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_NAME: &str = "scrubber.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the background file writer alive; dropping it flushes pending lines
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level_str` when set.
///
/// # Example
///
/// ```no_run
/// use scrubber::logging::init_logging;
/// use scrubber::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// let _guard = init_logging("info", &config)?;
/// // Keep _guard alive for the duration of the program
/// # Ok::<(), scrubber::domain::ScrubError>(())
/// ```
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level_str)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("scrubber={level}")))
    };

    let mut layers: Vec<BoxedLayer> = vec![tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter())
        .boxed()];

    let file_guard = if config.local_enabled {
        let (layer, guard) = json_file_layer(Path::new(&config.local_path), &config.local_rotation)?;
        layers.push(layer.with_filter(filter()).boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| ScrubError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(
        level = %level,
        file = config.local_enabled,
        path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn json_file_layer(dir: &Path, rotation: &str) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ScrubError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let appender = RollingFileAppender::new(rotation_from(rotation), dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .boxed();

    Ok((layer, guard))
}

/// Map a `local_rotation` value to an appender rotation; unknown values rotate daily
pub fn rotation_from(value: &str) -> Rotation {
    match value {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Parse a log level name, case-insensitively
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    level_str.trim().parse::<Level>().map_err(|_| {
        ScrubError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))
    })
}
