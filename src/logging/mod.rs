//! Logging and observability
//!
//! Structured logging through `tracing` with:
//! - Configurable log levels
//! - Console output on stderr
//! - Optional JSON file logging with rotation
//!
//! Detected PII never appears in log events; only labels, offsets, counts,
//! and timings are recorded.
//!
//! # Example
//!
//! ```no_run
//! use scrubber::logging::init_logging;
//! use scrubber::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! tracing::info!("Service started");
//! # Ok::<(), scrubber::domain::ScrubError>(())
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of a scrub request
///
/// # Example
///
/// ```no_run
/// use scrubber::log_scrub_complete;
///
/// log_scrub_complete!(3, 12u64);
/// ```
#[macro_export]
macro_rules! log_scrub_complete {
    ($detections:expr, $duration_ms:expr) => {
        tracing::info!(
            detections = $detections,
            duration_ms = $duration_ms,
            "Scrub completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use scrubber::log_error_with_context;
/// use scrubber::domain::ScrubError;
///
/// let error = ScrubError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
