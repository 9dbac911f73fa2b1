//! Replace and remove operators

use super::Operator;
use serde::{Deserialize, Serialize};

/// Replace operator - substitutes a fixed literal, or `<LABEL>` when none is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOperator {
    /// Literal inserted in place of the span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl ReplaceOperator {
    /// Create a replace operator with a fixed literal
    pub fn new(new_value: impl Into<String>) -> Self {
        Self {
            new_value: Some(new_value.into()),
        }
    }
}

impl Operator for ReplaceOperator {
    fn operate(&self, _original: &str, entity_label: &str) -> String {
        match &self.new_value {
            Some(value) => value.clone(),
            None => format!("<{entity_label}>"),
        }
    }

    fn name(&self) -> &'static str {
        "replace"
    }
}

/// Remove operator - deletes the span and closes the gap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOperator;

impl Operator for RemoveOperator {
    fn operate(&self, _original: &str, _entity_label: &str) -> String {
        String::new()
    }

    fn name(&self) -> &'static str {
        "remove"
    }
}
