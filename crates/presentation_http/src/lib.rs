//! Quotes API HTTP presentation layer
//!
//! Routes, middleware and handlers for the quotes HTTP API.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{
    ApiKeyAuthLayer, RateLimiterConfig, RateLimiterLayer, ValidatedJson, ValidationError,
};
pub use routes::{create_app, create_router};
pub use state::AppState;
