use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::core::error::{AppError, Result};
use crate::features::posts::models::{NewPost, Post};
use crate::features::posts::repositories::PostRepository;
use crate::features::posts::services::{FeedService, UploadService};
use crate::modules::storage::{MediaStorage, UploadedMedia};

/// Post with a fixed id and timestamp, for seeding feeds
pub fn sample_post(id: &str, created_at: DateTime<Utc>) -> Post {
    Post {
        id: id.to_string(),
        caption: Some(format!("caption {}", id)),
        url: format!("https://cdn.example.com/{}.png", id),
        file_type: "image".to_string(),
        file_name: format!("{}.png", id),
        created_at,
    }
}

/// Post repository kept in memory
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
    fail_inserts: bool,
    hide_reads: bool,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    /// Every insert fails like a lost database connection
    pub fn failing() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    /// Inserts succeed but lookups by id find nothing
    pub fn unreadable() -> Self {
        Self {
            hide_reads: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<()> {
        if self.fail_inserts {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut posts = self.posts.lock().unwrap();
        // Keep timestamps strictly increasing, like a single writer would see
        let latest = posts.iter().map(|p| p.created_at).max();
        let now = Utc::now();
        let created_at = match latest {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };

        posts.push(Post {
            id: post.id.clone(),
            caption: Some(post.caption.clone()),
            url: post.url.clone(),
            file_type: post.file_type.as_str().to_string(),
            file_name: post.file_name.clone(),
            created_at,
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
        if self.hide_reads {
            return Ok(None);
        }
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Post>> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }
}

/// One call received by [`FakeStorage`]
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub declared_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

enum FakeOutcome {
    Succeed,
    Fail(String),
    NoUrl,
}

/// Media provider double that records what it was sent
pub struct FakeStorage {
    outcome: FakeOutcome,
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeStorage {
    /// Stores `name` as `stored_<name>` under `https://cdn.example.com/`
    pub fn succeeding() -> Self {
        Self::with_outcome(FakeOutcome::Succeed)
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(FakeOutcome::Fail(message.to_string()))
    }

    /// Answers without a URL
    pub fn without_url() -> Self {
        Self::with_outcome(FakeOutcome::NoUrl)
    }

    fn with_outcome(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStorage for FakeStorage {
    async fn upload(
        &self,
        mut file: File,
        declared_name: &str,
        content_type: &str,
    ) -> Result<UploadedMedia> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .await
            .map_err(|e| AppError::ProviderUpload(e.to_string()))?;

        self.uploads.lock().unwrap().push(RecordedUpload {
            declared_name: declared_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });

        match &self.outcome {
            FakeOutcome::Succeed => {
                let name = format!("stored_{}", declared_name);
                UploadedMedia::from_provider(
                    Some(format!("https://cdn.example.com/{}", name)),
                    Some(name),
                    declared_name,
                )
            }
            FakeOutcome::Fail(message) => Err(AppError::ProviderUpload(message.clone())),
            FakeOutcome::NoUrl => UploadedMedia::from_provider(None, None, declared_name),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Services wired to in-memory doubles, staging into `staging_dir`
pub fn post_services(
    repository: Arc<InMemoryPostRepository>,
    storage: Arc<FakeStorage>,
    staging_dir: &std::path::Path,
) -> (Arc<UploadService>, Arc<FeedService>) {
    let repository: Arc<dyn PostRepository> = repository;
    let upload = Arc::new(UploadService::new(
        Arc::clone(&repository),
        storage,
        staging_dir.to_path_buf(),
    ));
    let feed = Arc::new(FeedService::new(repository));
    (upload, feed)
}
