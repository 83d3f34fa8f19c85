//! HTTP middleware components
//!
//! API key authentication, fixed-window rate limiting and validated request
//! extraction.

pub mod auth;
pub mod rate_limit;
pub mod validation;

pub use auth::{API_KEY_HEADER, ApiKeyAuth, ApiKeyAuthLayer};
pub use rate_limit::{
    RateLimitDecision, RateLimiter, RateLimiterConfig, RateLimiterLayer, RateLimiterState,
};
pub use validation::{ValidatedJson, ValidatedQuery, ValidationError};
