//! Quote service - random selection and quote submission

use std::{collections::HashSet, fmt, sync::Arc};

use domain::{DomainError, Quote, QuoteId, Slug};
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{MAX_IN_QUERY_VALUES, QuoteStore, TagStore},
};

/// A quote picked for display, along with the slug it was picked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomQuote {
    pub id: QuoteId,
    pub author: String,
    pub quote: String,
    /// Requested slug, or one of the quote's slugs when none was requested
    pub slug: String,
    /// Display label derived from `slug`
    pub tag: String,
}

impl RandomQuote {
    fn new(quote: &Quote, slug: Option<&Slug>) -> Self {
        Self {
            id: quote.id.clone(),
            author: quote.author.clone(),
            quote: quote.text.clone(),
            slug: slug.map(ToString::to_string).unwrap_or_default(),
            tag: slug.map(Slug::label).unwrap_or_default(),
        }
    }
}

/// Result of a random quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomQuoteOutcome {
    Found(RandomQuote),
    /// A slug was requested but no quote carries it
    NoneForSlug,
}

/// Service for reading and submitting quotes
pub struct QuoteService {
    quotes: Arc<dyn QuoteStore>,
    tags: Arc<dyn TagStore>,
}

impl fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteService").finish_non_exhaustive()
    }
}

impl QuoteService {
    pub fn new(quotes: Arc<dyn QuoteStore>, tags: Arc<dyn TagStore>) -> Self {
        Self { quotes, tags }
    }

    /// Pick a quote uniformly at random, optionally limited to one slug
    ///
    /// An empty collection is only an error when no slug was given; a slug
    /// with no quotes yields [`RandomQuoteOutcome::NoneForSlug`].
    #[instrument(skip_all, fields(slug = slug.map(Slug::as_str)))]
    pub async fn random_quote(
        &self,
        slug: Option<&Slug>,
    ) -> Result<RandomQuoteOutcome, ApplicationError> {
        let candidates = match slug {
            Some(slug) => self.quotes.find_quotes_by_slug(slug).await?,
            None => self.quotes.list_quotes().await?,
        };
        debug!(candidates = candidates.len(), "Loaded quote candidates");

        match (pick(&candidates, slug), slug) {
            (Some(quote), _) => Ok(RandomQuoteOutcome::Found(quote)),
            (None, Some(_)) => Ok(RandomQuoteOutcome::NoneForSlug),
            (None, None) => Err(ApplicationError::NotFound("No quotes found".to_string())),
        }
    }

    /// Store a quote under the submitted slugs that name existing tags
    ///
    /// Unknown slugs are dropped. Fails with [`ApplicationError::NotFound`]
    /// when none of the slugs match a tag. Re-submitting the same text
    /// overwrites the earlier document.
    #[instrument(skip_all, fields(slug_count = slugs.len()))]
    pub async fn add_quote(
        &self,
        author: String,
        text: String,
        slugs: Vec<String>,
    ) -> Result<QuoteId, ApplicationError> {
        if author.is_empty() {
            return Err(DomainError::MissingField("author").into());
        }
        if text.is_empty() {
            return Err(DomainError::MissingField("quote").into());
        }
        if slugs.is_empty() {
            return Err(DomainError::MissingField("slugs").into());
        }

        let submitted = dedup_slugs(slugs);
        let known = self.known_slugs(&submitted).await?;
        let valid: Vec<Slug> = submitted
            .into_iter()
            .filter(|slug| known.contains(slug))
            .collect();

        if valid.is_empty() {
            return Err(ApplicationError::NotFound(
                "No valid tags found".to_string(),
            ));
        }

        let quote = Quote::new(author, text, valid)?;
        self.quotes.set_quote(&quote).await?;

        info!(quote_id = %quote.id, slugs = quote.slugs.len(), "Quote stored");
        Ok(quote.id)
    }

    /// Look up which of `slugs` exist as tags, in store-sized batches
    async fn known_slugs(&self, slugs: &[Slug]) -> Result<HashSet<Slug>, ApplicationError> {
        let mut known = HashSet::new();
        for batch in slugs.chunks(MAX_IN_QUERY_VALUES) {
            let tags = self.tags.find_tags_by_slugs(batch).await?;
            known.extend(tags.into_iter().map(|tag| tag.slug));
        }
        Ok(known)
    }
}

fn pick(candidates: &[Quote], slug: Option<&Slug>) -> Option<RandomQuote> {
    let mut rng = rand::rng();
    let quote = candidates.choose(&mut rng)?;
    let slug = slug.or_else(|| quote.slugs.choose(&mut rng));
    Some(RandomQuote::new(quote, slug))
}

/// Drop empty and repeated slugs, keeping first-seen order
fn dedup_slugs(slugs: Vec<String>) -> Vec<Slug> {
    let mut seen = HashSet::new();
    slugs
        .into_iter()
        .filter_map(|raw| Slug::new(raw).ok())
        .filter(|slug| seen.insert(slug.clone()))
        .collect()
}
