//! Storage module for uploaded media
//!
//! Defines the [`MediaStorage`] seam the upload workflow talks to, plus two
//! providers: the ImageKit upload API and MinIO/S3-compatible object storage.

mod imagekit_client;
mod minio_client;

use async_trait::async_trait;
use tokio::fs::File;

use crate::core::error::AppError;

pub use imagekit_client::ImageKitClient;
pub use minio_client::MinIOClient;

/// What a provider hands back after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Public URL of the stored media
    pub url: String,
    /// Name assigned by the provider (not necessarily the client-supplied one)
    pub name: String,
}

impl UploadedMedia {
    /// Build from a provider answer, rejecting answers without a URL.
    ///
    /// When the provider omits the stored name, the declared name is kept.
    pub fn from_provider(
        url: Option<String>,
        name: Option<String>,
        declared_name: &str,
    ) -> Result<Self, AppError> {
        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                AppError::ProviderUpload(format!(
                    "provider returned no URL for '{}'",
                    declared_name
                ))
            })?;

        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| declared_name.to_string());

        Ok(Self { url, name })
    }
}

/// External media host the upload workflow forwards staged files to.
///
/// One attempt per call; implementations never retry.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload the opened staged file under the client-declared name
    async fn upload(
        &self,
        file: File,
        declared_name: &str,
        content_type: &str,
    ) -> Result<UploadedMedia, AppError>;

    /// Short provider name for logs
    fn provider_name(&self) -> &'static str;
}
