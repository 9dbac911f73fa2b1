//! PII detection building blocks
//!
//! Pattern recognizers compiled from validated definitions, the registry that
//! owns them, context-based confidence boosting, and the pluggable entity
//! extractor capability.

pub mod context;
pub mod definition;
pub mod extractor;
pub mod pattern;
pub mod predefined;
pub mod registry;

pub use context::{ContextEnhancer, ContextKeyword, TextWords};
pub use definition::{
    load_definitions, LanguageScope, RecognizerDefinition, Rule, Validator, DEFAULT_LANGUAGE,
    RESERVED_LABEL,
};
pub use extractor::{EntityCandidate, EntityExtractor, ExtractorError, NoopExtractor};
pub use pattern::PatternRecognizer;
pub use predefined::PREDEFINED_VERSION;
pub use registry::RecognizerRegistry;
