//! Tag entity

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{Slug, TagId},
};

/// A topical tag that quotes can be filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    /// Display name
    #[serde(rename = "tag")]
    pub name: String,
    pub slug: Slug,
    /// Image reference
    #[serde(rename = "img")]
    pub image: String,
}

impl Tag {
    /// Attach a store-assigned id to a new tag
    #[must_use]
    pub fn with_id(id: TagId, new_tag: NewTag) -> Self {
        Self {
            id,
            name: new_tag.name,
            slug: new_tag.slug,
            image: new_tag.image,
        }
    }
}

/// A tag that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub slug: Slug,
    pub image: String,
}

impl NewTag {
    /// Create a new tag; all three fields are required
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        image: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let image = image.into();

        if name.is_empty() {
            return Err(DomainError::MissingField("tag"));
        }
        let slug = Slug::new(slug)?;
        if image.is_empty() {
            return Err(DomainError::MissingField("img"));
        }

        Ok(Self { name, slug, image })
    }
}
