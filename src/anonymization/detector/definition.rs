//! Recognizer definitions and the recognizer configuration file
//!
//! The configuration file maps an entity label to its rule and context words:
//!
//! ```json
//! {
//!   "POSTCODE": {
//!     "pattern": {"name": "uk_postcode", "regex": "\\b[A-Z]{1,2}\\d[A-Z\\d]? ?\\d[A-Z]{2}\\b", "score": 0.6},
//!     "context": ["postcode", "post code", "address"]
//!   }
//! }
//! ```
//!
//! Entries are mapped to validated [`RecognizerDefinition`]s at load time. A single
//! malformed entry fails the whole load.

use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Language assumed for custom definitions that do not name one
pub const DEFAULT_LANGUAGE: &str = "en";

/// Label reserved for the fallback redaction operator
pub const RESERVED_LABEL: &str = "DEFAULT";

/// Languages a recognizer applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageScope {
    /// Every language
    Any,
    /// A single language code
    Only(String),
}

impl LanguageScope {
    /// Parse a language field; `any` and `*` select every language
    pub fn parse(language: &str) -> Self {
        match language.trim() {
            "*" => Self::Any,
            l if l.eq_ignore_ascii_case("any") => Self::Any,
            l => Self::Only(l.to_lowercase()),
        }
    }

    /// Check whether this scope covers a language code
    pub fn applies_to(&self, language: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Only(code) => code.eq_ignore_ascii_case(language),
        }
    }

    /// Check whether every language of `other` is also in this scope
    pub fn covers(&self, other: &LanguageScope) -> bool {
        match (self, other) {
            (Self::Any, _) => true,
            (Self::Only(_), Self::Any) => false,
            (Self::Only(code), Self::Only(other)) => code.eq_ignore_ascii_case(other),
        }
    }

    /// Check whether two scopes share at least one language
    pub fn overlaps(&self, other: &LanguageScope) -> bool {
        self.covers(other) || other.covers(self)
    }
}

impl std::fmt::Display for LanguageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Only(code) => write!(f, "{code}"),
        }
    }
}

/// Post-match validation applied to a candidate's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Luhn checksum over the digits of the match
    Luhn,
}

impl Validator {
    /// Check the matched text
    pub fn validate(&self, matched: &str) -> bool {
        match self {
            Self::Luhn => luhn_checksum_valid(matched),
        }
    }
}

fn luhn_checksum_valid(matched: &str) -> bool {
    let digits: Vec<u32> = matched.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 12 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// A single matching rule: regular expression plus base confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Rule name used in logs and explanations
    #[serde(default)]
    pub name: Option<String>,
    /// Regular expression
    pub regex: String,
    /// Base confidence in [0.0, 1.0]
    pub score: f64,
}

impl Rule {
    /// Create a new rule
    pub fn new(name: impl Into<String>, regex: impl Into<String>, score: f64) -> Self {
        Self {
            name: Some(name.into()),
            regex: regex.into(),
            score,
        }
    }
}

/// Validated recognizer configuration
///
/// Immutable once registered; shared read-only by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizerDefinition {
    /// PII category produced by this recognizer
    pub entity_label: String,
    /// Matching rules, at least one
    pub rules: Vec<Rule>,
    /// Case-insensitive words or phrases that raise confidence when found nearby
    pub context_keywords: Vec<String>,
    /// Languages the definition applies to
    pub language: LanguageScope,
    /// Optional post-match validation
    pub validator: Option<Validator>,
}

impl RecognizerDefinition {
    /// Create a definition for the default language
    pub fn new(entity_label: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            entity_label: entity_label.into(),
            rules,
            context_keywords: Vec::new(),
            language: LanguageScope::Only(DEFAULT_LANGUAGE.to_string()),
            validator: None,
        }
    }

    /// Set the context keywords
    pub fn with_context<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the language scope
    pub fn with_language(mut self, language: LanguageScope) -> Self {
        self.language = language;
        self
    }

    /// Set the validator
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Validate the structure of the definition
    ///
    /// Regex compilation is checked when the definition is registered.
    pub fn validate(&self) -> Result<()> {
        let label = self.entity_label.trim();
        if label.is_empty() {
            return Err(ScrubError::Configuration(
                "Recognizer definition has an empty entity label".to_string(),
            ));
        }
        if label == RESERVED_LABEL {
            return Err(ScrubError::Configuration(format!(
                "Entity label '{RESERVED_LABEL}' is reserved for the fallback operator"
            )));
        }
        if self.rules.is_empty() {
            return Err(ScrubError::Configuration(format!(
                "Recognizer '{label}' has no rules"
            )));
        }

        for rule in &self.rules {
            if rule.regex.is_empty() {
                return Err(ScrubError::Configuration(format!(
                    "Recognizer '{label}' has an empty regex"
                )));
            }
            if !rule.score.is_finite() || !(0.0..=1.0).contains(&rule.score) {
                return Err(ScrubError::Configuration(format!(
                    "Recognizer '{label}' has score {} outside [0.0, 1.0]",
                    rule.score
                )));
            }
        }

        if self.context_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ScrubError::Configuration(format!(
                "Recognizer '{label}' has an empty context keyword"
            )));
        }

        if let LanguageScope::Only(code) = &self.language {
            if code.trim().is_empty() {
                return Err(ScrubError::Configuration(format!(
                    "Recognizer '{label}' has an empty language code"
                )));
            }
        }

        Ok(())
    }
}

/// One entry of the recognizer configuration file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecognizerEntry {
    #[serde(default)]
    pattern: Option<Rule>,
    #[serde(default)]
    patterns: Vec<Rule>,
    #[serde(default)]
    context: Vec<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    validator: Option<Validator>,
}

/// Load recognizer definitions from a `.json` or `.toml` file
pub fn load_definitions(path: impl AsRef<Path>) -> Result<Vec<RecognizerDefinition>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScrubError::Configuration(format!(
            "Failed to read recognizer file {}: {e}",
            path.display()
        ))
    })?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => parse_json(&content),
        Some("toml") => parse_toml(&content),
        _ => Err(ScrubError::Configuration(format!(
            "Recognizer file must be a .json or .toml file: {}",
            path.display()
        ))),
    }
}

/// Parse recognizer definitions from JSON content
///
/// Definitions are returned in lexicographic label order.
pub fn parse_json(content: &str) -> Result<Vec<RecognizerDefinition>> {
    let entries: BTreeMap<String, RecognizerEntry> = serde_json::from_str(content)?;
    into_definitions(entries)
}

/// Parse recognizer definitions from TOML content
///
/// Definitions are returned in lexicographic label order.
pub fn parse_toml(content: &str) -> Result<Vec<RecognizerDefinition>> {
    let entries: BTreeMap<String, RecognizerEntry> = toml::from_str(content)?;
    into_definitions(entries)
}

fn into_definitions(
    entries: BTreeMap<String, RecognizerEntry>,
) -> Result<Vec<RecognizerDefinition>> {
    entries
        .into_iter()
        .map(|(label, entry)| {
            let mut rules: Vec<Rule> = entry.pattern.into_iter().collect();
            rules.extend(entry.patterns);

            let definition = RecognizerDefinition {
                entity_label: label,
                rules,
                context_keywords: entry.context,
                language: entry
                    .language
                    .as_deref()
                    .map(LanguageScope::parse)
                    .unwrap_or_else(|| LanguageScope::Only(DEFAULT_LANGUAGE.to_string())),
                validator: entry.validator,
            };
            definition.validate()?;
            Ok(definition)
        })
        .collect()
}
