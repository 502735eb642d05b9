use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::posts::handlers::{get_feed, upload_post};
use crate::features::posts::services::{FeedService, UploadService};

/// Create routes for the posts feature
pub fn routes(
    upload_service: Arc<UploadService>,
    feed_service: Arc<FeedService>,
    max_upload_body_size: usize,
) -> Router {
    let upload_routes = Router::new()
        .route(
            "/upload",
            post(upload_post).layer(DefaultBodyLimit::max(max_upload_body_size)),
        )
        .with_state(upload_service);

    let feed_routes = Router::new()
        .route("/feed", get(get_feed))
        .with_state(feed_service);

    upload_routes.merge(feed_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        post_services, sample_post, FakeStorage, InMemoryPostRepository,
    };
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use serde_json::Value;
    use std::path::Path;

    const TEST_BODY_LIMIT: usize = 1024 * 1024;

    struct App {
        server: TestServer,
        repository: Arc<InMemoryPostRepository>,
        storage: Arc<FakeStorage>,
        staging: tempfile::TempDir,
    }

    fn app(repository: InMemoryPostRepository, storage: FakeStorage) -> App {
        let staging = tempfile::tempdir().unwrap();
        let repository = Arc::new(repository);
        let storage = Arc::new(storage);
        let (upload, feed) =
            post_services(Arc::clone(&repository), Arc::clone(&storage), staging.path());
        let server = TestServer::new(routes(upload, feed, TEST_BODY_LIMIT)).unwrap();
        App {
            server,
            repository,
            storage,
            staging,
        }
    }

    fn upload_form(file_name: &str, mime: &str, caption: Option<&str>) -> MultipartForm {
        let part = Part::bytes(b"media-bytes".to_vec())
            .file_name(file_name)
            .mime_type(mime);
        let form = MultipartForm::new().add_part("file", part);
        match caption {
            Some(caption) => form.add_text("caption", caption.to_string()),
            None => form,
        }
    }

    fn staging_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_upload_then_feed_shows_newest_first() {
        let older = sample_post("older", Utc::now() - Duration::hours(1));
        let app = app(
            InMemoryPostRepository::with_posts(vec![older]),
            FakeStorage::succeeding(),
        );

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("cat.png", "image/png", Some("hi")))
            .await;
        response.assert_status_ok();
        let post: Value = response.json();
        assert_eq!(post["file_type"], "image");
        assert_eq!(post["caption"], "hi");
        assert_eq!(post["file_name"], "stored_cat.png");
        assert!(!post["id"].as_str().unwrap().is_empty());
        assert!(!post["url"].as_str().unwrap().is_empty());
        assert!(post["created_at"].as_str().is_some());

        let uploads = app.storage.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].content_type, "image/png");
        assert_eq!(uploads[0].bytes, b"media-bytes");

        let feed: Value = app.server.get("/feed").await.json();
        let posts = feed["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["id"], post["id"]);
        assert_eq!(posts[1]["id"], "older");

        assert!(staging_is_empty(app.staging.path()));
    }

    #[tokio::test]
    async fn test_upload_without_caption_defaults_to_empty() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::succeeding());

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("clip.mp4", "video/mp4", None))
            .await;

        response.assert_status_ok();
        let post: Value = response.json();
        assert_eq!(post["caption"], "");
        assert_eq!(post["file_type"], "video");
    }

    #[tokio::test]
    async fn test_upload_keeps_arbitrary_caption() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::succeeding());
        let caption: String = Sentence(3..8).fake();

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("cat.jpg", "image/jpeg", Some(&caption)))
            .await;

        response.assert_status_ok();
        let post: Value = response.json();
        assert_eq!(post["caption"], caption.as_str());
    }

    #[tokio::test]
    async fn test_upload_provider_failure_returns_detail() {
        let app = app(
            InMemoryPostRepository::new(),
            FakeStorage::failing("quota exceeded"),
        );

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("cat.png", "image/png", Some("hi")))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("quota exceeded"));
        assert_eq!(app.repository.len(), 0);
        assert!(staging_is_empty(app.staging.path()));
    }

    #[tokio::test]
    async fn test_upload_provider_without_url_inserts_nothing() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::without_url());

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("cat.png", "image/png", None))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.repository.len(), 0);
        assert!(staging_is_empty(app.staging.path()));
    }

    #[tokio::test]
    async fn test_upload_persistence_failure_cleans_staging() {
        let app = app(InMemoryPostRepository::failing(), FakeStorage::succeeding());

        let response = app
            .server
            .post("/upload")
            .multipart(upload_form("cat.png", "image/png", Some("hi")))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().starts_with("Database error"));
        assert!(staging_is_empty(app.staging.path()));
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::succeeding());

        let response = app
            .server
            .post("/upload")
            .multipart(MultipartForm::new().add_text("caption", "no file"))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["detail"], "File is required");
        assert!(app.storage.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_rejected() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::succeeding());
        let oversized = Part::bytes(vec![7u8; TEST_BODY_LIMIT * 2])
            .file_name("huge.mp4")
            .mime_type("video/mp4");

        let response = app
            .server
            .post("/upload")
            .multipart(MultipartForm::new().add_part("file", oversized))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json();
        assert!(!body["detail"].as_str().unwrap().is_empty());
        assert!(app.storage.uploads().is_empty());
        assert_eq!(app.repository.len(), 0);
        assert!(staging_is_empty(app.staging.path()));
    }

    #[tokio::test]
    async fn test_feed_empty() {
        let app = app(InMemoryPostRepository::new(), FakeStorage::succeeding());

        let response = app.server.get("/feed").await;

        response.assert_status_ok();
        let feed: Value = response.json();
        assert_eq!(feed["posts"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_feed_order_is_non_increasing() {
        let now = Utc::now();
        let seeded = (0..6)
            .map(|i| sample_post(&format!("p{}", i), now - Duration::minutes((i * 7 % 5) as i64)))
            .collect();
        let app = app(
            InMemoryPostRepository::with_posts(seeded),
            FakeStorage::succeeding(),
        );

        let feed: Value = app.server.get("/feed").await.json();
        let stamps: Vec<chrono::DateTime<Utc>> = feed["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["created_at"].as_str().unwrap().parse().unwrap())
            .collect();

        assert_eq!(stamps.len(), 6);
        assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
    }
}
