//! Mask operator

use super::Operator;
use serde::{Deserialize, Serialize};

fn default_masking_char() -> char {
    '*'
}

/// Mask operator - replaces characters with a masking character
///
/// Works on characters, not bytes, so multi-byte text keeps one mask
/// character per original character. When the kept prefix and suffix cover
/// the whole span the original text is returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskOperator {
    /// Character written in place of masked characters
    #[serde(default = "default_masking_char")]
    pub masking_char: char,
    /// Leading characters left unmasked
    #[serde(default)]
    pub keep_prefix: usize,
    /// Trailing characters left unmasked
    #[serde(default)]
    pub keep_suffix: usize,
}

impl MaskOperator {
    /// Create a mask operator
    pub fn new(masking_char: char, keep_prefix: usize, keep_suffix: usize) -> Self {
        Self {
            masking_char,
            keep_prefix,
            keep_suffix,
        }
    }
}

impl Default for MaskOperator {
    fn default() -> Self {
        Self::new(default_masking_char(), 0, 0)
    }
}

impl Operator for MaskOperator {
    fn operate(&self, original: &str, _entity_label: &str) -> String {
        let total = original.chars().count();
        if self.keep_prefix.saturating_add(self.keep_suffix) >= total {
            return original.to_string();
        }

        let masked = total - self.keep_prefix - self.keep_suffix;
        original
            .chars()
            .enumerate()
            .map(|(idx, c)| {
                if idx < self.keep_prefix || idx >= self.keep_prefix + masked {
                    c
                } else {
                    self.masking_char
                }
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "mask"
    }
}
