//! Quote handlers

use application::{RandomQuote, RandomQuoteOutcome};
use axum::{Json, extract::State};
use domain::Slug;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::CreatedResponse;
use crate::{
    error::ApiError,
    middleware::{ValidatedJson, ValidatedQuery},
    state::AppState,
};

/// Marker returned with 200 when a slug filter matches nothing
pub const NO_QUOTES_FOUND: &str = "No quotes found";

/// Query parameters for `GET /random`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RandomQuery {
    /// Only consider quotes filed under this slug; empty counts as absent
    #[serde(default)]
    pub slug: Option<String>,
}

/// Body of `GET /random`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RandomQuoteResponse {
    Quote(RandomQuote),
    Empty { error: &'static str },
}

/// Pick a random quote, optionally filtered by slug
#[instrument(skip(state))]
pub async fn random_quote(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RandomQuery>,
) -> Result<Json<RandomQuoteResponse>, ApiError> {
    let slug = query.slug.and_then(|s| Slug::new(s).ok());

    let body = match state.quote_service.random_quote(slug.as_ref()).await? {
        RandomQuoteOutcome::Found(quote) => RandomQuoteResponse::Quote(quote),
        RandomQuoteOutcome::NoneForSlug => RandomQuoteResponse::Empty {
            error: NO_QUOTES_FOUND,
        },
    };

    Ok(Json(body))
}

/// Body of `POST /quote`
#[derive(Debug, Deserialize, Validate)]
pub struct AddQuoteRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub author: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub quote: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "must be a non-empty list of slugs"))]
    pub slugs: Vec<String>,
}

/// Store a quote under the submitted slugs that name existing tags
#[instrument(skip(state, request), fields(slugs = request.slugs.len()))]
pub async fn add_quote(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AddQuoteRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state
        .quote_service
        .add_quote(request.author, request.quote, request.slugs)
        .await?;

    Ok(Json(CreatedResponse::new(id.as_str())))
}

#[cfg(test)]
mod tests {
    use domain::QuoteId;

    use super::*;

    #[test]
    fn empty_marker_serializes_as_error_object() {
        let body = RandomQuoteResponse::Empty {
            error: NO_QUOTES_FOUND,
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"error": "No quotes found"})
        );
    }

    #[test]
    fn quote_serializes_flat() {
        let body = RandomQuoteResponse::Quote(RandomQuote {
            id: QuoteId::from_existing("abc"),
            author: "Seneca".to_string(),
            quote: "Luck is preparation.".to_string(),
            slug: "daily-motivation".to_string(),
            tag: "Daily Motivation".to_string(),
        });

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "id": "abc",
                "author": "Seneca",
                "quote": "Luck is preparation.",
                "slug": "daily-motivation",
                "tag": "Daily Motivation"
            })
        );
    }

    #[test]
    fn add_quote_request_requires_every_field() {
        let request: AddQuoteRequest = serde_json::from_str(r#"{"author": "A"}"#).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("quote"));
        assert!(fields.contains_key("slugs"));
        assert!(!fields.contains_key("author"));
    }
}
