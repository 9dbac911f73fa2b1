//! # Scrubber - PII detection and redaction
//!
//! Scrubber finds personally identifiable information in free text
//! (transcripts, chat messages, notes) and rewrites the text with every
//! detected span replaced through a configurable operator.
//!
//! ## Overview
//!
//! - **Detection** pools candidates from an entity extractor and from
//!   regular-expression recognizers, boosts pattern candidates that have
//!   context keywords nearby, and keeps a disjoint set of spans
//! - **Redaction** replaces each span with a fixed literal, a `<LABEL>`
//!   placeholder, a mask, a hash, or nothing
//!
//! ## Architecture
//!
//! - [`anonymization`] - Analyzer, anonymizer, recognizers and the [`anonymization::ScrubEngine`] facade
//! - [`config`] - Configuration management
//! - [`domain`] - Error and result types
//! - [`server`] - HTTP service
//! - [`cli`] - Command-line interface
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use scrubber::anonymization::ScrubEngine;
//! use scrubber::config::ScrubberConfig;
//!
//! let engine = ScrubEngine::from_config(&ScrubberConfig::default())?;
//! let scrubbed = engine.scrub("Reach me on 07700 900123", "en")?;
//! assert_eq!(scrubbed, "Reach me on <REDACTED>");
//! # Ok::<(), scrubber::domain::ScrubError>(())
//! ```
//!
//! ## Error Handling
//!
//! The core reports [`domain::ScrubError`]: `Configuration`, `Analysis`, or
//! `Overlap`. A failed scrub never returns partially redacted text.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod server;
