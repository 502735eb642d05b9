use utoipa::{Modify, OpenApi};

use crate::features::legacy_posts::{
    dtos as legacy_posts_dtos, handlers as legacy_posts_handlers, models as legacy_posts_models,
};
use crate::features::posts::{dtos as posts_dtos, handlers as posts_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Posts
        posts_handlers::upload_post,
        posts_handlers::get_feed,
        // Legacy text posts
        legacy_posts_handlers::list_posts,
        legacy_posts_handlers::get_post,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Posts
            posts_dtos::UploadPostDto,
            posts_dtos::PostResponseDto,
            posts_dtos::FeedResponseDto,
            // Legacy text posts
            legacy_posts_models::LegacyPost,
            legacy_posts_dtos::LegacyPostListing,
        )
    ),
    tags(
        (name = "posts", description = "Media upload and feed"),
        (name = "legacy", description = "Static text posts kept from the first prototype"),
    ),
    info(
        title = "Media Feed API",
        version = "0.1.0",
        description = "Upload media with a caption and read the feed",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
