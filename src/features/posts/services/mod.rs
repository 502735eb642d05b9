mod feed_service;
pub mod staging;
mod upload_service;

pub use feed_service::FeedService;
pub use staging::StagedUpload;
pub use upload_service::UploadService;
