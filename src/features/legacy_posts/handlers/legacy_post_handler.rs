use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppPath, AppQuery};
use crate::features::legacy_posts::dtos::{LegacyPostListing, LegacyPostsQuery};
use crate::features::legacy_posts::models::{LegacyPost, LegacyPostCatalog};
use crate::shared::types::ErrorResponse;

/// List the legacy text posts
#[utoipa::path(
    get,
    path = "/posts",
    tag = "legacy",
    params(LegacyPostsQuery),
    responses(
        (status = 200, description = "Mapping of all posts, or an array when limit is set", body = LegacyPostListing),
        (status = 422, description = "Malformed limit", body = ErrorResponse)
    )
)]
pub async fn list_posts(
    State(catalog): State<Arc<LegacyPostCatalog>>,
    AppQuery(query): AppQuery<LegacyPostsQuery>,
) -> Json<LegacyPostListing> {
    Json(LegacyPostListing::from_catalog(&catalog, query.limit))
}

/// Get a legacy text post by id
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "legacy",
    params(
        ("id" = i64, Path, description = "Post id (1-10)")
    ),
    responses(
        (status = 200, description = "Post found", body = LegacyPost),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn get_post(
    State(catalog): State<Arc<LegacyPostCatalog>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<LegacyPost>> {
    catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}
