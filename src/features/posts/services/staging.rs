use std::path::Path;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::shared::files::file_extension;

/// An incoming upload written to local disk.
///
/// The staged file is removed when this value is dropped, whichever way the
/// request ends.
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    declared_name: String,
    content_type: String,
    size: u64,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as sent by the client
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// MIME type as sent by the client
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Reopen the staged file for reading
    pub async fn open(&self) -> Result<File> {
        File::open(self.path()).await.map_err(|e| {
            AppError::Staging(format!(
                "Failed to reopen staged file {}: {}",
                self.path().display(),
                e
            ))
        })
    }
}

/// Write `stream` to a uniquely named file in `dir`, keeping the extension of
/// `declared_name`.
pub async fn stage_stream<S>(
    dir: &Path,
    declared_name: &str,
    content_type: &str,
    stream: S,
) -> Result<StagedUpload>
where
    S: Stream<Item = Result<Bytes>>,
{
    let suffix = file_extension(declared_name)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| {
            AppError::Staging(format!(
                "Failed to create staging file in {}: {}",
                dir.display(),
                e
            ))
        })?;

    // From here on `path` owns the file on disk; any early return deletes it.
    let (std_file, path) = staged.into_parts();
    let mut file = File::from_std(std_file);
    let mut stream = std::pin::pin!(stream);
    let mut size: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Staging(format!("Failed to write staging file: {}", e)))?;
        size += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Staging(format!("Failed to flush staging file: {}", e)))?;

    debug!(
        "Staged '{}' ({} bytes) at {}",
        declared_name,
        size,
        path.display()
    );

    Ok(StagedUpload {
        path,
        declared_name: declared_name.to_string(),
        content_type: content_type.to_string(),
        size,
    })
}
