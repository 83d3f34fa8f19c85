//! Tag handlers

use axum::{Json, extract::State};
use domain::Tag;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::CreatedResponse;
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// List every tag
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.tag_service.list_tags().await?))
}

/// Body of `POST /tag`
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub tag: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub slug: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub img: String,
}

/// Create a tag with a store-assigned id
#[instrument(skip(state, request), fields(slug = %request.slug))]
pub async fn add_tag(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AddTagRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state
        .tag_service
        .add_tag(request.tag, request.slug, request.img)
        .await?;

    Ok(Json(CreatedResponse::new(id.as_str())))
}
