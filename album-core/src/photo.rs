//! Turning a selected image file into an embeddable photo payload.
//!
//! Photos are stored inline on the record as `data:` URLs, so an album
//! survives being copied without its source images.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

pub use crate::person::placeholder_avatar_url;

/// Errors from photo resolution.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image file is empty")]
    Empty,

    #[error("Image is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}

/// Resolves a selected file to a value usable as a record's photo URL.
#[async_trait]
pub trait PhotoResolver {
    async fn resolve(&self, path: &Path) -> Result<String, PhotoError>;
}

/// Reads the file and encodes it as a base64 `data:` URL.
#[derive(Debug, Clone, Default)]
pub struct DataUrlResolver {
    max_bytes: Option<u64>,
}

impl DataUrlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject files larger than `limit` bytes.
    pub fn with_max_bytes(mut self, limit: u64) -> Self {
        self.max_bytes = Some(limit);
        self
    }
}

#[async_trait]
impl PhotoResolver for DataUrlResolver {
    async fn resolve(&self, path: &Path) -> Result<String, PhotoError> {
        let mime = mime_for_path(path)?;

        if let Some(limit) = self.max_bytes {
            let size = fs::metadata(path).await?.len();
            if size > limit {
                return Err(PhotoError::TooLarge { size, limit });
            }
        }

        let bytes = fs::read(path).await?;
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }

        debug!(path = %path.display(), bytes = bytes.len(), mime, "encoded photo");
        Ok(data_url(mime, &bytes))
    }
}

/// Image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Result<&'static str, PhotoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        "bmp" => Ok("image/bmp"),
        "svg" => Ok("image/svg+xml"),
        _ => Err(PhotoError::UnsupportedType(ext)),
    }
}

/// Build a base64 `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
