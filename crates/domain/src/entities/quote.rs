//! Quote entity

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{QuoteId, Slug},
};

/// A quote attributed to an author and filed under one or more tag slugs
///
/// The id is always [`QuoteId::from_text`] of the quote text for quotes
/// created through [`Quote::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub author: String,
    #[serde(rename = "quote")]
    pub text: String,
    pub slugs: Vec<Slug>,
}

impl Quote {
    /// Create a quote, deriving its id from the text
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        slugs: Vec<Slug>,
    ) -> Result<Self, DomainError> {
        let author = author.into();
        let text = text.into();

        if author.is_empty() {
            return Err(DomainError::MissingField("author"));
        }
        if text.is_empty() {
            return Err(DomainError::MissingField("quote"));
        }
        if slugs.is_empty() {
            return Err(DomainError::ValidationError(
                "a quote needs at least one slug".to_string(),
            ));
        }

        Ok(Self {
            id: QuoteId::from_text(&text),
            author,
            text,
            slugs,
        })
    }

    /// Rebuild a quote read from the store
    ///
    /// Stored documents are trusted as-is: the id is not re-derived and the
    /// slug list may be empty.
    #[must_use]
    pub fn from_stored(
        id: QuoteId,
        author: impl Into<String>,
        text: impl Into<String>,
        slugs: Vec<Slug>,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            text: text.into(),
            slugs,
        }
    }

    /// Whether the quote is filed under the given slug
    #[must_use]
    pub fn has_slug(&self, slug: &Slug) -> bool {
        self.slugs.contains(slug)
    }
}
