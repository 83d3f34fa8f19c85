//! Request validation
//!
//! `ValidatedJson` deserializes a JSON body and runs its `validator` rules.
//! Malformed bodies and failed rules are both answered with 400, so missing
//! or mistyped fields never reach a service. `ValidatedQuery` does the same
//! for the query string.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Invalid query: {0}")]
    QueryError(#[from] QueryRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::JsonError(e) => e.body_text(),
            Self::QueryError(e) => e.body_text(),
            Self::ValidationFailed(msg) => msg,
        };
        debug!(error = %message, "Rejected request input");

        let body = serde_json::json!({
            "error": message,
            "code": "validation_error"
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// A JSON extractor that also validates the request body
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct AddTagRequest {
///     #[validate(length(min = 1, message = "is required"))]
///     tag: String,
/// }
///
/// async fn handler(ValidatedJson(req): ValidatedJson<AddTagRequest>) {}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;
        Ok(Self(value))
    }
}

/// A query string extractor that also validates the parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate().map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;
        Ok(Self(value))
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
