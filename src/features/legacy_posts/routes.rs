use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::legacy_posts::handlers;
use crate::features::legacy_posts::models::LegacyPostCatalog;

/// Create routes for the legacy text posts
pub fn routes(catalog: Arc<LegacyPostCatalog>) -> Router {
    Router::new()
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{id}", get(handlers::get_post))
        .with_state(catalog)
}
