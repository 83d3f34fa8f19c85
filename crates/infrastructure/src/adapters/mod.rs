//! Adapters - Implementations of application ports

mod firestore_store;
mod in_memory_store;

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{QuoteStore, TagStore},
};
use tracing::info;

pub use firestore_store::FirestoreStore;
pub use in_memory_store::InMemoryStore;

use crate::config::{StoreBackend, StoreConfig};

/// Port handles backed by one store instance
#[derive(Clone)]
pub struct Stores {
    pub quotes: Arc<dyn QuoteStore>,
    pub tags: Arc<dyn TagStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// Use one value for both collections
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: QuoteStore + TagStore + 'static,
    {
        Self {
            quotes: Arc::clone(&store) as Arc<dyn QuoteStore>,
            tags: store,
        }
    }
}

/// Build the configured store backend
///
/// # Errors
///
/// Returns an error if the Firestore client cannot be created.
pub fn build_stores(config: &StoreConfig) -> Result<Stores, ApplicationError> {
    match config.backend {
        StoreBackend::Firestore => {
            info!(
                project = %config.firestore.project_id,
                base_url = %config.firestore.base_url,
                "Using Firestore document store"
            );
            let store = FirestoreStore::new(config.firestore.to_client_config())?;
            Ok(Stores::shared(Arc::new(store)))
        },
        StoreBackend::Memory => {
            info!("Using in-memory document store; data is lost on restart");
            Ok(Stores::shared(Arc::new(InMemoryStore::new())))
        },
    }
}
