//! Operator configuration
//!
//! Operators are configured per entity label, with a `DEFAULT` entry used for
//! every label that has no specific one:
//!
//! ```toml
//! [anonymizer.operators.DEFAULT]
//! type = "replace"
//! new_value = "<REDACTED>"
//!
//! [anonymizer.operators.CREDIT_CARD]
//! type = "mask"
//! masking_char = "*"
//! keep_suffix = 4
//! ```

use super::hashing::HashOperator;
use super::masking::MaskOperator;
use super::redaction::{RemoveOperator, ReplaceOperator};
use super::Operator;
use crate::anonymization::detector::RESERVED_LABEL;
use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal inserted by the default operator
pub const REDACTION_LITERAL: &str = "<REDACTED>";

/// Redaction policy for one entity label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperatorConfig {
    /// Substitute a fixed literal
    Replace(ReplaceOperator),
    /// Replace characters with a masking character
    Mask(MaskOperator),
    /// Substitute a digest of the span
    Hash(HashOperator),
    /// Delete the span
    Remove,
}

impl OperatorConfig {
    /// Replace with a literal
    pub fn replace(new_value: impl Into<String>) -> Self {
        Self::Replace(ReplaceOperator::new(new_value))
    }

    /// Validate operator parameters
    pub fn validate(&self) -> Result<()> {
        if let Self::Mask(mask) = self {
            if mask.masking_char.is_control() {
                return Err(ScrubError::Configuration(format!(
                    "Masking character {:?} is a control character",
                    mask.masking_char
                )));
            }
        }
        Ok(())
    }
}

impl Operator for OperatorConfig {
    fn operate(&self, original: &str, entity_label: &str) -> String {
        match self {
            Self::Replace(op) => op.operate(original, entity_label),
            Self::Mask(op) => op.operate(original, entity_label),
            Self::Hash(op) => op.operate(original, entity_label),
            Self::Remove => RemoveOperator.operate(original, entity_label),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Replace(op) => op.name(),
            Self::Mask(op) => op.name(),
            Self::Hash(op) => op.name(),
            Self::Remove => RemoveOperator.name(),
        }
    }
}

/// Operators keyed by entity label, with an optional `DEFAULT` fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorConfigs {
    operators: BTreeMap<String, OperatorConfig>,
}

impl OperatorConfigs {
    /// Create an empty operator table with no fallback
    pub fn empty() -> Self {
        Self {
            operators: BTreeMap::new(),
        }
    }

    /// Create a table holding only a `DEFAULT` operator
    pub fn with_default(operator: OperatorConfig) -> Self {
        Self::empty().with(RESERVED_LABEL, operator)
    }

    /// Add or replace the operator for a label
    pub fn with(mut self, entity_label: impl Into<String>, operator: OperatorConfig) -> Self {
        self.operators.insert(entity_label.into(), operator);
        self
    }

    /// Operator for a label, falling back to `DEFAULT`
    pub fn resolve(&self, entity_label: &str) -> Result<&OperatorConfig> {
        self.operators
            .get(entity_label)
            .or_else(|| self.operators.get(RESERVED_LABEL))
            .ok_or_else(|| {
                ScrubError::Configuration(format!(
                    "No operator configured for '{entity_label}' and no {RESERVED_LABEL} operator"
                ))
            })
    }

    /// Whether a `DEFAULT` operator is configured
    pub fn has_default(&self) -> bool {
        self.operators.contains_key(RESERVED_LABEL)
    }

    /// Add the `DEFAULT` operator when none is configured
    pub fn ensure_default(&mut self, operator: OperatorConfig) {
        self.operators
            .entry(RESERVED_LABEL.to_string())
            .or_insert(operator);
    }

    /// Validate every configured operator
    pub fn validate(&self) -> Result<()> {
        for (label, operator) in &self.operators {
            if label.trim().is_empty() {
                return Err(ScrubError::Configuration(
                    "Operator configured for an empty entity label".to_string(),
                ));
            }
            operator.validate().map_err(|e| {
                ScrubError::Configuration(format!("Invalid operator for '{label}': {e}"))
            })?;
        }
        Ok(())
    }

    /// Number of configured operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check whether no operator is configured
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorConfigs {
    fn default() -> Self {
        Self::with_default(OperatorConfig::replace(REDACTION_LITERAL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::hashing::HashAlgorithm;

    #[test]
    fn test_default_table_redacts_everything() {
        let operators = OperatorConfigs::default();
        let operator = operators.resolve("ANYTHING").unwrap();
        assert_eq!(operator.operate("x", "ANYTHING"), REDACTION_LITERAL);
        assert_eq!(operator.name(), "replace");
    }

    #[test]
    fn test_specific_operator_wins_over_default() {
        let operators = OperatorConfigs::default().with("POSTCODE", OperatorConfig::Remove);
        assert_eq!(operators.resolve("POSTCODE").unwrap(), &OperatorConfig::Remove);
        assert_eq!(
            operators.resolve("EMAIL_ADDRESS").unwrap(),
            &OperatorConfig::replace(REDACTION_LITERAL)
        );
    }

    #[test]
    fn test_missing_operator_is_config_error() {
        let operators = OperatorConfigs::empty().with("POSTCODE", OperatorConfig::Remove);
        let result = operators.resolve("EMAIL_ADDRESS");
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_ensure_default_keeps_configured_fallback() {
        let mut operators = OperatorConfigs::with_default(OperatorConfig::Remove);
        operators.ensure_default(OperatorConfig::replace(REDACTION_LITERAL));
        assert_eq!(operators.resolve("X").unwrap(), &OperatorConfig::Remove);

        let mut operators = OperatorConfigs::empty();
        assert!(!operators.has_default());
        operators.ensure_default(OperatorConfig::replace(REDACTION_LITERAL));
        assert!(operators.has_default());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let content = r##"
[DEFAULT]
type = "replace"
new_value = "<REDACTED>"

[CREDIT_CARD]
type = "mask"
masking_char = "#"
keep_suffix = 4

[EMAIL_ADDRESS]
type = "hash"
algorithm = "sha512"

[PERSON]
type = "remove"

[POSTCODE]
type = "replace"
"##;
        let operators: OperatorConfigs = toml::from_str(content).unwrap();
        assert_eq!(operators.len(), 5);
        assert_eq!(
            operators.resolve("CREDIT_CARD").unwrap(),
            &OperatorConfig::Mask(MaskOperator::new('#', 0, 4))
        );
        assert_eq!(
            operators.resolve("EMAIL_ADDRESS").unwrap(),
            &OperatorConfig::Hash(HashOperator::new(HashAlgorithm::Sha512))
        );
        assert_eq!(operators.resolve("PERSON").unwrap(), &OperatorConfig::Remove);
        assert_eq!(
            operators.resolve("POSTCODE").unwrap().operate("SW1A 1AA", "POSTCODE"),
            "<POSTCODE>"
        );
    }

    #[test]
    fn test_unknown_hash_algorithm_is_rejected() {
        let content = r#"
[DEFAULT]
type = "hash"
algorithm = "md5"
"#;
        assert!(toml::from_str::<OperatorConfigs>(content).is_err());
    }

    #[test]
    fn test_control_masking_char_is_rejected() {
        let operators =
            OperatorConfigs::with_default(OperatorConfig::Mask(MaskOperator::new('\n', 0, 0)));
        assert!(operators.validate().is_err());
    }
}
