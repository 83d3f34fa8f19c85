//! Application layer - Use cases and orchestration
//!
//! Contains the quote and tag use cases and the store ports they depend on.
//! Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
