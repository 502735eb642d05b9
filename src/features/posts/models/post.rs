use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: String,
    pub caption: Option<String>,
    pub url: String,
    pub file_type: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// A post ready for insertion; `created_at` is assigned by the database
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: String,
    pub caption: String,
    pub url: String,
    pub file_type: MediaKind,
    pub file_name: String,
}

/// Kind of media a post carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is a video; everything else, including unknown types, is an image
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}
