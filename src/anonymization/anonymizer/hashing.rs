//! Hash operator

use super::Operator;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Digest algorithm for the hash operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

/// Hash operator - substitutes the lowercase hex digest of the span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashOperator {
    /// Digest algorithm
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

impl HashOperator {
    /// Create a hash operator
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl Operator for HashOperator {
    fn operate(&self, original: &str, _entity_label: &str) -> String {
        match self.algorithm {
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(original.as_bytes())),
            HashAlgorithm::Sha512 => format!("{:x}", Sha512::digest(original.as_bytes())),
        }
    }

    fn name(&self) -> &'static str {
        "hash"
    }
}
