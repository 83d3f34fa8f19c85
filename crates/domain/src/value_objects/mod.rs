//! Value Objects - Immutable, identity-less domain primitives

mod quote_id;
mod slug;
mod tag_id;

pub use quote_id::QuoteId;
pub use slug::Slug;
pub use tag_id::TagId;
