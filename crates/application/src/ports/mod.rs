//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod quote_store;
mod tag_store;

#[cfg(test)]
pub use quote_store::MockQuoteStore;
pub use quote_store::QuoteStore;
#[cfg(test)]
pub use tag_store::MockTagStore;
pub use tag_store::{MAX_IN_QUERY_VALUES, TagStore};
