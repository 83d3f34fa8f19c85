//! Application state shared across handlers

use std::sync::Arc;

use application::{QuoteService, TagService};
use infrastructure::{AppConfig, Stores};

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Random selection and quote submission
    pub quote_service: Arc<QuoteService>,
    /// Tag listing and creation
    pub tag_service: Arc<TagService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the services onto the given stores
    #[must_use]
    pub fn new(stores: Stores, config: AppConfig) -> Self {
        Self {
            quote_service: Arc::new(QuoteService::new(stores.quotes, Arc::clone(&stores.tags))),
            tag_service: Arc::new(TagService::new(stores.tags)),
            config: Arc::new(config),
        }
    }
}
