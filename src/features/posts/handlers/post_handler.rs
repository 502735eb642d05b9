use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::posts::dtos::{FeedResponseDto, PostResponseDto, UploadPostDto};
use crate::features::posts::services::{FeedService, StagedUpload, UploadService};
use crate::shared::types::ErrorResponse;

fn is_too_large(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// Upload a media file with an optional caption
///
/// Accepts multipart/form-data with:
/// - `file`: The image or video to upload (required)
/// - `caption`: Free text (optional, defaults to "")
#[utoipa::path(
    post,
    path = "/upload",
    tag = "posts",
    request_body(
        content = UploadPostDto,
        content_type = "multipart/form-data",
        description = "Media file and optional caption",
    ),
    responses(
        (status = 200, description = "Post created", body = PostResponseDto),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 422, description = "File field missing", body = ErrorResponse),
        (status = 500, description = "Staging, provider or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_post(
    State(service): State<Arc<UploadService>>,
    mut multipart: Multipart,
) -> Result<Json<PostResponseDto>, AppError> {
    let mut staged: Option<StagedUpload> = None;
    let mut caption = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        if is_too_large(&e) {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
        }
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let chunks = field.map_err(|e| {
                    if is_too_large(&e) {
                        AppError::PayloadTooLarge(e.body_text())
                    } else {
                        AppError::Staging(format!("Failed to read upload stream: {}", e.body_text()))
                    }
                });

                staged = Some(service.stage(&file_name, &content_type, chunks).await?);
            }
            "caption" => {
                caption = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read caption field: {}", e.body_text()))
                })?;
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let staged = staged.ok_or_else(|| AppError::Validation("File is required".to_string()))?;

    let post = service.publish(staged, caption).await?;

    Ok(Json(post))
}

/// Get the feed, newest first
#[utoipa::path(
    get,
    path = "/feed",
    tag = "posts",
    responses(
        (status = 200, description = "All posts, newest first", body = FeedResponseDto),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_feed(
    State(service): State<Arc<FeedService>>,
) -> Result<Json<FeedResponseDto>, AppError> {
    let feed = service.get_feed().await?;
    Ok(Json(feed))
}
