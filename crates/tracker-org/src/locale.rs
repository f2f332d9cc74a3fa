//! Supported display locales
//!
//! Tracker is bilingual. Every user-facing string and every organization
//! display record exists once per locale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported display locale.
///
/// # Examples
///
/// ```
/// use tracker_org::Locale;
///
/// assert_eq!(Locale::parse("FR"), Some(Locale::Fr));
/// assert_eq!(Locale::En.as_str(), "en");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    En,

    /// French
    Fr,
}

impl Locale {
    /// All supported locales, in catalog order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Fr];

    /// Parse a locale tag (case-insensitive).
    ///
    /// Region subtags are ignored, so `fr-CA` parses as [`Locale::Fr`].
    pub fn parse(s: &str) -> Option<Self> {
        let tag = s.trim().to_lowercase();
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        match language {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    /// Lowercase tag for this locale.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::En
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse(" Fr "), Some(Locale::Fr));
        assert_eq!(Locale::parse("fr-CA"), Some(Locale::Fr));
        assert_eq!(Locale::parse("en_GB"), Some(Locale::En));
        assert_eq!(Locale::parse("de"), None);
        assert_eq!(Locale::parse(""), None);
    }

    #[test]
    fn test_locale_serde() {
        let json = serde_json::to_string(&Locale::Fr).unwrap();
        assert_eq!(json, "\"fr\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }
}
