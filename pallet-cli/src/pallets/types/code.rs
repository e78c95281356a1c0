//! Storage location codes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A storage location code: `S` followed by exactly two digits (e.g. "S21")
///
/// Input is case-insensitive; the stored form is always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code([u8; 3]);

/// Error when parsing a location code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// Input is empty after trimming
    Empty,
    /// Input does not have the `S` + two digits shape
    Malformed { input: String },
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::Empty => write!(f, "location code cannot be empty"),
            CodeError::Malformed { input } => write!(
                f,
                "'{}' is not a location code (expected S followed by two digits, e.g. S21)",
                input
            ),
        }
    }
}

impl std::error::Error for CodeError {}

impl Code {
    /// Parse a code, ignoring surrounding whitespace and letter case
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CodeError::Empty);
        }

        match trimmed.as_bytes() {
            [s, d1, d2] if s.eq_ignore_ascii_case(&b'S') && d1.is_ascii_digit() && d2.is_ascii_digit() => {
                Ok(Code([b'S', *d1, *d2]))
            }
            _ => Err(CodeError::Malformed {
                input: trimmed.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII bytes
        std::str::from_utf8(&self.0).unwrap_or("S??")
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Code::parse(s)
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Code::parse(&raw).map_err(serde::de::Error::custom)
    }
}
