//! Lenient decoding of `partSizeBytes`.
//!
//! The control-plane encodes 64-bit sizes either as JSON numbers or as
//! strings (to survive JavaScript number precision). Both forms decode to
//! the same `i64`. Use with `#[serde(with = "crate::part_size")]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a string-encoded part size is not an integer.
#[derive(Debug, thiserror::Error)]
#[error("invalid partSizeBytes value {value:?}: {source}")]
pub struct PartSizeError {
    pub value: String,
    #[source]
    pub source: std::num::ParseIntError,
}

/// Parses a string-encoded part size.
///
/// Surrounding whitespace is ignored and an empty string means "unset" (0).
pub fn parse_part_size(raw: &str) -> Result<i64, PartSizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<i64>().map_err(|source| PartSizeError {
        value: trimmed.to_string(),
        source,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(i64),
    Text(String),
}

pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    value.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Repr::Number(n)) => Ok(n),
        Some(Repr::Text(s)) => parse_part_size(&s).map_err(serde::de::Error::custom),
    }
}
