//! Stable line identifiers
//!
//! ID format: `l-{7-char-hash}` (e.g. `l-7f2b4c1`).
//!
//! The hash is derived from the line's raw text and its 1-based position,
//! so identical documents produce identical IDs across runs. Two lines
//! with the same text at different positions get different IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid line ID format: expected 'l-{{7-char-hash}}', got '{0}'")]
    InvalidLineId(String),
}

/// Line ID in the format `l-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId {
    hash: String,
}

impl LineId {
    /// Derives the ID for a line from its raw text and 1-based position
    pub fn derive(raw: &str, line_no: u32) -> Self {
        let input = format!("{}\u{0}{}", line_no, raw);
        let hash = blake3::hash(input.as_bytes());
        let hex = hash.to_hex();
        Self {
            hash: hex[..7].to_string(),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l-{}", self.hash)
    }
}

impl FromStr for LineId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("l-")
            .ok_or_else(|| IdError::InvalidLineId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidLineId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for LineId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.to_string()
    }
}
