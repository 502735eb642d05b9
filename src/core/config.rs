use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub staging: StagingConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Which media provider backs `POST /upload`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    ImageKit,
    MinIO,
}

impl StorageProvider {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "imagekit" => Ok(Self::ImageKit),
            "minio" | "s3" => Ok(Self::MinIO),
            other => Err(format!(
                "Invalid STORAGE_PROVIDER '{}': expected 'imagekit' or 'minio'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    /// Descriptive tags attached to every uploaded file
    pub tags: Vec<String>,
    /// Present only when `provider` is ImageKit
    pub imagekit: Option<ImageKitConfig>,
    pub minio: MinIOConfig,
}

/// ImageKit upload API configuration
#[derive(Debug, Clone)]
pub struct ImageKitConfig {
    /// Private API key, sent as the basic-auth username
    pub private_key: String,
    pub upload_url: String,
    /// Optional destination folder on the provider side
    pub folder: Option<String>,
    pub timeout: Duration,
}

/// MinIO/S3 storage configuration
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Endpoint used to build public URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Key prefix for uploaded media (e.g., "media")
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Directory where incoming uploads are staged before forwarding
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            staging: StagingConfig::from_env(),
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_UPLOAD_BODY_SIZE: usize = 100 * 1024 * 1024; // 100MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins =
            split_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let max_upload_body_size = env::var("MAX_UPLOAD_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_UPLOAD_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_upload_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl StorageConfig {
    const DEFAULT_TAGS: &'static str = "feed-upload";

    pub fn from_env() -> Result<Self, String> {
        let provider = StorageProvider::parse(
            &env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "imagekit".to_string()),
        )?;

        let tags = split_list(
            &env::var("STORAGE_TAGS").unwrap_or_else(|_| Self::DEFAULT_TAGS.to_string()),
        );

        let imagekit = match provider {
            StorageProvider::ImageKit => Some(ImageKitConfig::from_env()?),
            StorageProvider::MinIO => None,
        };

        Ok(Self {
            provider,
            tags,
            imagekit,
            minio: MinIOConfig::from_env(),
        })
    }
}

impl ImageKitConfig {
    const DEFAULT_UPLOAD_URL: &'static str = "https://upload.imagekit.io/api/v1/files/upload";
    const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let private_key = env::var("IMAGEKIT_PRIVATE_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                "IMAGEKIT_PRIVATE_KEY is required when STORAGE_PROVIDER=imagekit".to_string()
            })?;

        let upload_url =
            env::var("IMAGEKIT_UPLOAD_URL").unwrap_or_else(|_| Self::DEFAULT_UPLOAD_URL.to_string());

        let folder = env::var("IMAGEKIT_FOLDER").ok().filter(|s| !s.is_empty());

        let timeout_secs = parse_var("IMAGEKIT_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            private_key,
            upload_url,
            folder,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MinIOConfig {
    pub fn from_env() -> Self {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Self {
            endpoint,
            public_endpoint,
            access_key: env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            bucket: env::var("MINIO_BUCKET").unwrap_or_else(|_| "media-feed".to_string()),
            region: env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            prefix: env::var("MINIO_PREFIX").unwrap_or_else(|_| "media".to_string()),
        }
    }
}

impl StagingConfig {
    pub fn from_env() -> Self {
        let dir = env::var("UPLOAD_STAGING_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        Self { dir }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            title: env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Media Feed API".to_string()),
            version: env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string()),
            description: env::var("SWAGGER_DESCRIPTION")
                .unwrap_or_else(|_| "Upload media with a caption and read the feed".to_string()),
        }
    }
}

/// Split a comma-separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr + ToString,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid number", name))
}
