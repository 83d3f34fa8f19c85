//! Deterministic quote identifier
//!
//! A quote's document id is derived from its text, so submitting the same
//! quote twice addresses the same document.
//!
//! # Examples
//!
//! ```
//! use domain::QuoteId;
//!
//! let a = QuoteId::from_text("Stay hungry, stay foolish.");
//! let b = QuoteId::from_text("  stay HUNGRY, stay foolish.  ");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str().len(), 64);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of a quote document
///
/// Either derived from quote text via [`QuoteId::from_text`], or carried over
/// verbatim from a document that already exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Derive the id for a quote text
    ///
    /// The text is trimmed and lowercased, then hashed with SHA-256 and
    /// rendered as lowercase hex.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        let digest = Sha256::digest(normalized.as_bytes());
        Self(hex::encode(digest))
    }

    /// Wrap an id read back from the store
    #[must_use]
    pub fn from_existing(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        // sha256("hello")
        assert_eq!(
            QuoteId::from_text("hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(QuoteId::from_text("  HeLLo \n"), QuoteId::from_text("hello"));
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert_ne!(QuoteId::from_text("a b"), QuoteId::from_text("a  b"));
    }

    #[test]
    fn is_lowercase_hex() {
        let id = QuoteId::from_text("Anything");
        assert_eq!(id.as_str().len(), 64);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn from_existing_keeps_value() {
        let id = QuoteId::from_existing("legacy-id");
        assert_eq!(id.as_str(), "legacy-id");
        assert_eq!(id.to_string(), "legacy-id");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = QuoteId::from_existing("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
