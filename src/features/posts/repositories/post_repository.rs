use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::posts::models::{NewPost, Post};

/// Persistence of post metadata.
///
/// Ids are generated here, before insert, so callers never rely on database
/// defaults to learn a post's id.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fresh, never-reused post id
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    async fn insert(&self, post: &NewPost) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>>;

    /// All posts, newest first; ties on `created_at` break on `id` descending
    async fn list_recent(&self) -> Result<Vec<Post>>;
}

/// Postgres-backed post repository
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, caption, url, file_type, file_name)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&post.id)
        .bind(&post.caption)
        .bind(&post.url)
        .bind(post.file_type.as_str())
        .bind(&post.file_name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!("Post row inserted: id={}", post.id);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, caption, url, file_type, file_name, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_recent(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, caption, url, file_type, file_name, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
