//! MinIO/S3-compatible storage client
//!
//! Streams staged uploads into a bucket under generated unique keys and
//! serves them from the configured public endpoint.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tokio::fs::File;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{MediaStorage, UploadedMedia};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;
use crate::shared::files::file_extension;

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn is_already_exists(message: &str) -> bool {
    message.contains("BucketAlreadyOwnedByYou")
        || message.contains("BucketAlreadyExists")
        || message.contains("already own it")
}

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    prefix: String,
    tags: Vec<String>,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration.
    ///
    /// No network traffic happens here; call [`MinIOClient::ensure_bucket_exists`]
    /// once at startup.
    pub fn new(config: MinIOConfig, tags: Vec<String>) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, prefix: {}",
            config.endpoint,
            bucket.name(),
            config.prefix
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            prefix: config.prefix,
            tags,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Ok(response) => {
                if is_already_exists(&response.response_text) {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    Err(AppError::ProviderUpload(format!(
                        "Could not create bucket '{}' at {}: HTTP {} - {}",
                        self.bucket.name(),
                        self.endpoint,
                        response.response_code,
                        response.response_text
                    )))
                }
            }
            Err(e) => {
                if is_already_exists(&e.to_string()) {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    Err(AppError::ProviderUpload(format!(
                        "Could not create bucket '{}' at {}: {}",
                        self.bucket.name(),
                        self.endpoint,
                        e
                    )))
                }
            }
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Generate a unique object name and key for a declared file name.
    ///
    /// Returns `(key, name)`, e.g. `("media/<uuid>.png", "<uuid>.png")`.
    pub fn generate_key(&self, declared_name: &str) -> (String, String) {
        let id = Uuid::new_v4();
        let name = match file_extension(declared_name) {
            Some(ext) => format!("{}.{}", id, ext.to_lowercase()),
            None => id.to_string(),
        };
        let key = if self.prefix.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), name)
        };
        (key, name)
    }

    /// Public URL for an object key
    pub fn get_public_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_endpoint.trim_end_matches('/'),
            self.bucket.name(),
            key
        )
    }

    /// Attach the configured tags; failures are logged, not returned
    async fn tag_object(&self, key: &str) {
        if self.tags.is_empty() {
            return;
        }

        let tags: Vec<(&str, &str)> = self.tags.iter().map(|t| (t.as_str(), "true")).collect();
        match self.bucket.put_object_tagging(key, &tags).await {
            Ok(response) if !is_success(response.status_code()) => {
                warn!(
                    "Failed to tag object '{}': HTTP {}",
                    key,
                    response.status_code()
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to tag object '{}': {}", key, e),
        }
    }
}

#[async_trait]
impl MediaStorage for MinIOClient {
    async fn upload(
        &self,
        mut file: File,
        declared_name: &str,
        content_type: &str,
    ) -> Result<UploadedMedia, AppError> {
        let (key, name) = self.generate_key(declared_name);

        let response = self
            .bucket
            .put_object_stream_with_content_type(&mut file, &key, content_type)
            .await
            .map_err(|e| {
                AppError::ProviderUpload(format!("Failed to upload file '{}': {}", key, e))
            })?;

        if !is_success(response.status_code()) {
            return Err(AppError::ProviderUpload(format!(
                "MinIO rejected '{}': HTTP {}",
                key,
                response.status_code()
            )));
        }

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());

        self.tag_object(&key).await;

        UploadedMedia::from_provider(Some(self.get_public_url(&key)), Some(name), declared_name)
    }

    fn provider_name(&self) -> &'static str {
        "minio"
    }
}
