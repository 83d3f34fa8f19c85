//! Application services - Use case implementations

mod quote_service;
mod tag_service;

pub use quote_service::{QuoteService, RandomQuote, RandomQuoteOutcome};
pub use tag_service::TagService;
