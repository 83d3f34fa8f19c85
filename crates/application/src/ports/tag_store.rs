//! Tag storage port
//!
//! Defines the interface to the `tags` collection of the document store.

use async_trait::async_trait;
use domain::{NewTag, Slug, Tag, TagId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Largest number of values a single "slug in set" lookup may carry
///
/// Callers with more slugs split them into batches of this size.
pub const MAX_IN_QUERY_VALUES: usize = 10;

/// Port for tag persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Fetch every tag in the collection
    async fn list_tags(&self) -> Result<Vec<Tag>, ApplicationError>;

    /// Fetch the tags whose slug is one of `slugs`
    ///
    /// `slugs` holds at most [`MAX_IN_QUERY_VALUES`] entries.
    async fn find_tags_by_slugs(&self, slugs: &[Slug]) -> Result<Vec<Tag>, ApplicationError>;

    /// Store a new tag and return the id the store assigned to it
    async fn add_tag(&self, tag: &NewTag) -> Result<TagId, ApplicationError>;
}
