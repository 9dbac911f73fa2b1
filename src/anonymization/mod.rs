//! PII detection and redaction
//!
//! # Architecture
//!
//! A request flows one way through the pipeline:
//! - **Detection**: the [`analyzer::AnalyzerEngine`] runs the entity extractor
//!   and the pattern recognizers of the [`detector::RecognizerRegistry`],
//!   boosts pattern candidates with nearby context keywords, and reduces the
//!   pooled candidates to a disjoint set
//! - **Anonymization**: the [`anonymizer::AnonymizerEngine`] rewrites the text,
//!   replacing each detection through its configured operator
//! - **Audit**: optional log of each scrub with hashed PII values
//!
//! [`ScrubEngine`] composes these for a single call.
//!
//! # Usage
//!
//! ```rust
//! use scrubber::anonymization::ScrubEngine;
//! use scrubber::config::ScrubberConfig;
//!
//! let engine = ScrubEngine::from_config(&ScrubberConfig::default())?;
//! let outcome = engine.scrub_with_context("Card 4111 1111 1111 1111", "en", &["payment"])?;
//! assert_eq!(outcome.text, "Card <REDACTED>");
//! # Ok::<(), scrubber::domain::ScrubError>(())
//! ```

pub mod analyzer;
pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;

// Re-export main types
pub use analyzer::{resolve_overlaps, AnalyzerEngine};
pub use anonymizer::{AnonymizerEngine, OperatorConfig, OperatorConfigs};
pub use engine::{ScrubEngine, DEFAULT_CONTEXT_HINTS, REDACTION_LITERAL};
pub use models::{AnonymizerResult, Detection, DetectionMethod, OperatorResult, ScrubOutcome};
