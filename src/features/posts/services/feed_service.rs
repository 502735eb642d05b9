use std::sync::Arc;

use tracing::debug;

use crate::core::error::Result;
use crate::features::posts::dtos::{FeedResponseDto, PostResponseDto};
use crate::features::posts::repositories::PostRepository;

/// Read side of the feed
pub struct FeedService {
    repository: Arc<dyn PostRepository>,
}

impl FeedService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    /// Every post, newest first
    pub async fn get_feed(&self) -> Result<FeedResponseDto> {
        let posts = self.repository.list_recent().await?;
        debug!("Feed loaded with {} posts", posts.len());

        Ok(FeedResponseDto {
            posts: posts.into_iter().map(PostResponseDto::from).collect(),
        })
    }
}
