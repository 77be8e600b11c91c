use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

/// Prefix carried by every hex digest.
pub const HEX_PREFIX: &str = "0x";

/// Hash primitives used for docseal identifiers and fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// Keccak-256 (pre-standard SHA-3 padding), used for on-chain identifiers.
    #[serde(rename = "keccak-256")]
    Keccak256,
    /// SHA-256, used for text and prompt fingerprints.
    #[serde(rename = "sha-256")]
    Sha256,
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlg::Keccak256 => write!(f, "keccak-256"),
            DigestAlg::Sha256 => write!(f, "sha-256"),
        }
    }
}

/// 256-bit digest rendered as `0x` followed by 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Encodes raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Digest(format!("{}{}", HEX_PREFIX, hex::encode(bytes)))
    }

    /// Parses a prefixed hex digest. Upper-case hex digits are accepted and
    /// folded to lower case so the stored form is always canonical.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let folded = value.to_ascii_lowercase();
        let re = Regex::new(r"^0x[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&folded) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value,
            });
        }
        Ok(Digest(folded))
    }

    /// Returns the prefixed hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Digest {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Digest::parse(value)
    }
}

impl From<Digest> for String {
    fn from(value: Digest) -> Self {
        value.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
