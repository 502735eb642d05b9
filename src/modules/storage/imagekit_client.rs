//! ImageKit upload API client
//!
//! Streams a staged file to the ImageKit upload endpoint as multipart form
//! data, asking the provider to assign a unique file name.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::{MediaStorage, UploadedMedia};
use crate::core::config::ImageKitConfig;
use crate::core::error::AppError;

/// Subset of the ImageKit upload response the service relies on
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageKitUploadResponse {
    file_id: Option<String>,
    name: Option<String>,
    url: Option<String>,
}

pub struct ImageKitClient {
    http_client: Client,
    upload_url: String,
    private_key: String,
    folder: Option<String>,
    tags: Vec<String>,
}

impl ImageKitClient {
    pub fn new(config: ImageKitConfig, tags: Vec<String>) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "ImageKit client initialized for endpoint: {}, tags: {:?}",
            config.upload_url, tags
        );

        Ok(Self {
            http_client,
            upload_url: config.upload_url,
            private_key: config.private_key,
            folder: config.folder,
            tags,
        })
    }

    fn build_form(&self, part: Part, declared_name: &str) -> Form {
        let mut form = Form::new()
            .part("file", part)
            .text("fileName", declared_name.to_string())
            .text("useUniqueFileName", "true");

        if !self.tags.is_empty() {
            form = form.text("tags", self.tags.join(","));
        }
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        form
    }
}

#[async_trait]
impl MediaStorage for ImageKitClient {
    async fn upload(
        &self,
        file: File,
        declared_name: &str,
        _content_type: &str,
    ) -> Result<UploadedMedia, AppError> {
        let length = file
            .metadata()
            .await
            .map_err(|e| AppError::ProviderUpload(format!("Failed to stat staged file: {}", e)))?
            .len();

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
            .file_name(declared_name.to_string());

        let response = self
            .http_client
            .post(&self.upload_url)
            .basic_auth(&self.private_key, Some(""))
            .multipart(self.build_form(part, declared_name))
            .send()
            .await
            .map_err(|e| {
                AppError::ProviderUpload(format!("Failed to upload '{}': {}", declared_name, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ProviderUpload(format!(
                "ImageKit rejected '{}': {} - {}",
                declared_name, status, body
            )));
        }

        let body: ImageKitUploadResponse = response.json().await.map_err(|e| {
            AppError::ProviderUpload(format!("Invalid ImageKit upload response: {}", e))
        })?;

        debug!(
            "ImageKit stored '{}' as {:?} (file_id={:?})",
            declared_name, body.name, body.file_id
        );

        UploadedMedia::from_provider(body.url, body.name, declared_name)
    }

    fn provider_name(&self) -> &'static str {
        "imagekit"
    }
}
