//! Tag slug value object
//!
//! Slugs are the keys that link quotes to tags and the filter accepted by the
//! random quote endpoint.
//!
//! # Examples
//!
//! ```
//! use domain::Slug;
//!
//! let slug = Slug::new("daily-motivation").unwrap();
//! assert_eq!(slug.label(), "Daily Motivation");
//! assert!(Slug::new("").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A non-empty tag slug
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Create a slug, rejecting empty input
    pub fn new(slug: impl Into<String>) -> Result<Self, DomainError> {
        let value = slug.into();
        if value.is_empty() {
            return Err(DomainError::MissingField("slug"));
        }
        Ok(Self(value))
    }

    /// Wrap a slug read back from the store without validation
    #[must_use]
    pub fn from_stored(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Get the slug as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: hyphen-separated words, each capitalized
    ///
    /// Only the first character of each segment is changed; empty segments
    /// are kept, so `"a--b"` becomes `"A  B"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.0
            .split('-')
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
