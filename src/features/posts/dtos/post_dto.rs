use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::posts::models::Post;

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPostDto {
    /// The image or video to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Optional caption, defaults to an empty string
    #[schema(example = "Sunset at the pier")]
    pub caption: Option<String>,
}

/// A post as returned by `POST /upload` and inside the feed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostResponseDto {
    /// Unique identifier of the post
    pub id: String,
    pub caption: String,
    /// Public URL of the media
    pub url: String,
    /// "image" or "video"
    #[schema(example = "image")]
    pub file_type: String,
    /// Name assigned by the storage provider
    pub file_name: String,
    /// Insertion time (ISO-8601)
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponseDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            caption: post.caption.unwrap_or_default(),
            url: post.url,
            file_type: post.file_type,
            file_name: post.file_name,
            created_at: post.created_at,
        }
    }
}

/// Response of `GET /feed`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedResponseDto {
    /// All posts, newest first
    pub posts: Vec<PostResponseDto>,
}
