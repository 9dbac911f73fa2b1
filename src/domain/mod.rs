//! Domain error and result types.
//!
//! All fallible operations of the core return [`Result<T>`] with [`ScrubError`]:
//!
//! ```rust
//! use scrubber::domain::{Result, ScrubError};
//!
//! fn example() -> Result<()> {
//!     Err(ScrubError::analysis("fr", "unsupported language"))
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::ScrubError;
pub use result::Result;
