//! Relay global identifiers
//!
//! The API exposes opaque ids of the form `base64("<Type>:<key>")`. This
//! module encodes and decodes them and sanitizes raw client input.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use thiserror::Error;

/// Errors produced while handling client-supplied ids.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlobalIdError {
    /// Input was empty after sanitizing
    #[error("Empty id")]
    Empty,

    /// Input was not valid base64
    #[error("Invalid base64 in id: {0}")]
    InvalidEncoding(String),

    /// Decoded bytes were not a `Type:key` pair
    #[error("Malformed global id: {0}")]
    Malformed(String),
}

/// A decoded relay global id.
///
/// # Examples
///
/// ```
/// use tracker_org::GlobalId;
///
/// let id = GlobalId::new("Organization", "1");
/// let encoded = id.encode();
/// assert_eq!(GlobalId::decode(&encoded).unwrap(), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    /// GraphQL type name
    pub type_name: String,

    /// Store key
    pub key: String,
}

impl GlobalId {
    /// Creates a global id from its parts.
    pub fn new(type_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key: key.into(),
        }
    }

    /// Encode as `base64("<Type>:<key>")`.
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.type_name, self.key))
    }

    /// Decode an encoded id.
    ///
    /// The key may itself contain `:`; only the first separator splits.
    pub fn decode(encoded: &str) -> Result<Self, GlobalIdError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| GlobalIdError::InvalidEncoding(e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| GlobalIdError::Malformed(encoded.to_string()))?;
        let (type_name, key) = text
            .split_once(':')
            .ok_or_else(|| GlobalIdError::Malformed(encoded.to_string()))?;
        if type_name.is_empty() || key.is_empty() {
            return Err(GlobalIdError::Malformed(encoded.to_string()));
        }
        Ok(Self::new(type_name, key))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Sanitize raw client input.
///
/// Trims surrounding whitespace and strips control characters.
pub fn clean_input(raw: &str) -> Result<String, GlobalIdError> {
    let cleaned: String = raw.trim().chars().filter(|c| !c.is_control()).collect();
    if cleaned.is_empty() {
        return Err(GlobalIdError::Empty);
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_value() {
        // base64("Organization:1")
        assert_eq!(GlobalId::new("Organization", "1").encode(), "T3JnYW5pemF0aW9uOjE=");
    }

    #[test]
    fn test_decode_key_with_separator() {
        let encoded = STANDARD.encode("Organization:a:b");
        let id = GlobalId::decode(&encoded).unwrap();
        assert_eq!(id.type_name, "Organization");
        assert_eq!(id.key, "a:b");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            GlobalId::decode("!!not base64!!"),
            Err(GlobalIdError::InvalidEncoding(_))
        ));
        let no_separator = STANDARD.encode("Organization");
        assert!(matches!(
            GlobalId::decode(&no_separator),
            Err(GlobalIdError::Malformed(_))
        ));
    }

    #[test]
    fn test_clean_input() {
        assert_eq!(clean_input("  abc\n").unwrap(), "abc");
        assert_eq!(clean_input("a\u{0}b").unwrap(), "ab");
        assert_eq!(clean_input("   "), Err(GlobalIdError::Empty));
    }
}
