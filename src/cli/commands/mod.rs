//! CLI command implementations
//!
//! Commands return a process exit code:
//! 0 success, 1 scrub failure, 2 configuration error, 5 fatal error.

pub mod scrub;
pub mod serve;
pub mod validate;
