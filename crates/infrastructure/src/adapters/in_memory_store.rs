//! In-memory adapter - Implements QuoteStore and TagStore with process-local maps
//!
//! Used for local development without a Firestore project and in tests.

use application::{
    error::ApplicationError,
    ports::{QuoteStore, TagStore},
};
use async_trait::async_trait;
use domain::{NewTag, Quote, Slug, Tag, TagId};
use rand::{Rng, distr::Alphanumeric};
use tokio::sync::RwLock;
use tracing::instrument;

/// Length of generated tag ids, matching Firestore auto-ids
const GENERATED_ID_LEN: usize = 20;

/// Document store held entirely in memory
///
/// Collections keep insertion order; overwriting a quote keeps its position.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    quotes: RwLock<Vec<Quote>>,
    tags: RwLock<Vec<Tag>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given records
    pub fn with_records(quotes: Vec<Quote>, tags: Vec<Tag>) -> Self {
        Self {
            quotes: RwLock::new(quotes),
            tags: RwLock::new(tags),
        }
    }

    fn generate_id() -> TagId {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_ID_LEN)
            .map(char::from)
            .collect();
        TagId::new(id)
    }
}

#[async_trait]
impl QuoteStore for InMemoryStore {
    async fn list_quotes(&self) -> Result<Vec<Quote>, ApplicationError> {
        Ok(self.quotes.read().await.clone())
    }

    async fn find_quotes_by_slug(&self, slug: &Slug) -> Result<Vec<Quote>, ApplicationError> {
        Ok(self
            .quotes
            .read()
            .await
            .iter()
            .filter(|q| q.has_slug(slug))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, quote), fields(quote_id = %quote.id))]
    async fn set_quote(&self, quote: &Quote) -> Result<(), ApplicationError> {
        let mut quotes = self.quotes.write().await;
        match quotes.iter_mut().find(|q| q.id == quote.id) {
            Some(existing) => *existing = quote.clone(),
            None => quotes.push(quote.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl TagStore for InMemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApplicationError> {
        Ok(self.tags.read().await.clone())
    }

    async fn find_tags_by_slugs(&self, slugs: &[Slug]) -> Result<Vec<Tag>, ApplicationError> {
        Ok(self
            .tags
            .read()
            .await
            .iter()
            .filter(|t| slugs.contains(&t.slug))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, tag), fields(slug = %tag.slug))]
    async fn add_tag(&self, tag: &NewTag) -> Result<TagId, ApplicationError> {
        let id = Self::generate_id();
        self.tags
            .write()
            .await
            .push(Tag::with_id(id.clone(), tag.clone()));
        Ok(id)
    }
}
