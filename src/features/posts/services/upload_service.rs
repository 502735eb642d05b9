use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::posts::dtos::PostResponseDto;
use crate::features::posts::models::{MediaKind, NewPost};
use crate::features::posts::repositories::PostRepository;
use crate::features::posts::services::staging::{stage_stream, StagedUpload};
use crate::modules::storage::MediaStorage;

/// Upload workflow: stage, forward to the media provider, persist
pub struct UploadService {
    repository: Arc<dyn PostRepository>,
    storage: Arc<dyn MediaStorage>,
    staging_dir: PathBuf,
}

impl UploadService {
    pub fn new(
        repository: Arc<dyn PostRepository>,
        storage: Arc<dyn MediaStorage>,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            repository,
            storage,
            staging_dir,
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Stage an incoming file stream to local disk
    pub async fn stage<S>(
        &self,
        declared_name: &str,
        content_type: &str,
        stream: S,
    ) -> Result<StagedUpload>
    where
        S: Stream<Item = Result<Bytes>>,
    {
        stage_stream(&self.staging_dir, declared_name, content_type, stream).await
    }

    /// Forward a staged file to the provider and persist the resulting post.
    ///
    /// Takes ownership of `staged`; the staged file is gone when this returns,
    /// successful or not.
    pub async fn publish(&self, staged: StagedUpload, caption: String) -> Result<PostResponseDto> {
        let file = staged.open().await?;
        let media = self
            .storage
            .upload(file, staged.declared_name(), staged.content_type())
            .await?;

        let new_post = NewPost {
            id: self.repository.next_id(),
            caption,
            url: media.url,
            file_type: MediaKind::from_content_type(staged.content_type()),
            file_name: media.name,
        };

        if let Err(e) = self.repository.insert(&new_post).await {
            // The remote copy stays behind; nothing references it.
            warn!(
                "Orphaned {} upload after persistence failure: name={}, url={}",
                self.storage.provider_name(),
                new_post.file_name,
                new_post.url
            );
            return Err(e);
        }

        let post = self
            .repository
            .find_by_id(&new_post.id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Post {} not found after insert", new_post.id))
            })?;

        info!(
            "Post created: id={}, file_type={}, size={}, url={}",
            post.id,
            post.file_type,
            staged.size(),
            post.url
        );

        drop(staged);
        Ok(post.into())
    }
}
