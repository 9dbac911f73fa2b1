//! Detection and result data models

pub mod detection;
pub mod outcome;

pub use detection::{Detection, DetectionMethod};
pub use outcome::{AnonymizerResult, OperatorResult, ScrubOutcome};
