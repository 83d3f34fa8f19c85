//! Tag service - listing and creating tags

use std::{fmt, sync::Arc};

use domain::{NewTag, Tag, TagId};
use tracing::{info, instrument};

use crate::{error::ApplicationError, ports::TagStore};

/// Service for the tag catalogue
pub struct TagService {
    tags: Arc<dyn TagStore>,
}

impl fmt::Debug for TagService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagService").finish_non_exhaustive()
    }
}

impl TagService {
    pub fn new(tags: Arc<dyn TagStore>) -> Self {
        Self { tags }
    }

    /// All tags, in store order
    #[instrument(skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApplicationError> {
        self.tags.list_tags().await
    }

    /// Create a tag; the store assigns the id
    ///
    /// Slugs are not checked for uniqueness.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn add_tag(
        &self,
        name: String,
        slug: String,
        image: String,
    ) -> Result<TagId, ApplicationError> {
        let tag = NewTag::new(name, slug, image)?;
        let id = self.tags.add_tag(&tag).await?;
        info!(tag_id = %id, "Tag stored");
        Ok(id)
    }
}
