//! Quote storage port
//!
//! Defines the interface to the `quotes` collection of the document store.

use async_trait::async_trait;
use domain::{Quote, Slug};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for quote persistence
///
/// Quote documents are keyed by [`domain::QuoteId`], so saving a quote whose
/// text was stored before replaces the earlier document.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Fetch every quote in the collection
    async fn list_quotes(&self) -> Result<Vec<Quote>, ApplicationError>;

    /// Fetch the quotes whose slug list contains `slug` (exact match)
    async fn find_quotes_by_slug(&self, slug: &Slug) -> Result<Vec<Quote>, ApplicationError>;

    /// Create or fully overwrite the document at `quote.id`
    async fn set_quote(&self, quote: &Quote) -> Result<(), ApplicationError>;
}
