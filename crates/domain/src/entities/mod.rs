//! Domain entities - Objects with identity

mod quote;
mod tag;

pub use quote::Quote;
pub use tag::{NewTag, Tag};
