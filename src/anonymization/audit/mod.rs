//! Audit logging module
//!
//! Records scrub operations with hashed PII values.

pub mod logger;

pub use logger::AuditLogger;
