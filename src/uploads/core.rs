use super::error::UploadError;
use crate::UploadsConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

const STAGING_DIR: &str = "staging";

/// Validates and stores uploaded images, handing back the relative URL that
/// the store's `image` field carries. Consumers prefix it with the API base
/// when rendering.
#[derive(Clone)]
pub struct ImageStore {
    config: UploadsConfig,
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub url: String,
    pub path: PathBuf,
}

impl ImageStore {
    pub fn new(config: UploadsConfig) -> Self {
        Self { config }
    }

    pub fn get_config(&self) -> &UploadsConfig {
        &self.config
    }

    /// Cheap pre-flight check: runs before any byte touches the disk, so a
    /// 6 MiB file or a PDF is rejected without a partial upload attempt.
    pub fn validate(&self, content_type: &str, size: usize) -> Result<(), UploadError> {
        if !content_type.starts_with("image/") {
            return Err(UploadError::UnsupportedMediaType(content_type.to_string()));
        }
        if size > self.config.max_bytes {
            return Err(UploadError::PayloadTooLarge {
                size,
                max: self.config.max_bytes,
            });
        }
        Ok(())
    }

    /// Writes the payload to a staging preview first and promotes it to a
    /// stable `{uuid}.{ext}` name on success. If anything fails in between,
    /// the preview guard removes the staging file on drop.
    pub async fn store(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, UploadError> {
        self.validate(content_type, bytes.len())?;

        let preview = PreviewImage::acquire(&self.config.directory.join(STAGING_DIR), bytes).await?;

        let name = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        let path = self.config.directory.join(&name);
        preview.promote(&path).await?;

        debug!("Stored image {:?} ({} bytes)", path, bytes.len());

        Ok(StoredImage {
            url: format!("{}/{}", self.config.url_prefix.trim_end_matches('/'), name),
            path,
        })
    }

    /// Maps a request path to a stored image file. Staging previews and
    /// anything outside the uploads directory are not reachable.
    pub async fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() || relative.starts_with(STAGING_DIR) {
            return None;
        }

        let file_path = self.config.directory.join(relative);
        if !file_path.starts_with(&self.config.directory)
            || relative.split('/').any(|segment| segment == "..")
        {
            warn!("Rejected upload path traversal attempt: {}", path);
            return None;
        }

        match tokio::fs::metadata(&file_path).await {
            Ok(metadata) if metadata.is_file() => Some(file_path),
            _ => None,
        }
    }
}

/// Transient, non-persisted image resource. The underlying file is released
/// exactly once: on promotion to a stable name, on explicit release, or on
/// drop (error and teardown paths).
pub struct PreviewImage {
    path: PathBuf,
    released: bool,
}

impl PreviewImage {
    pub async fn acquire(staging_dir: &Path, bytes: &[u8]) -> Result<Self, UploadError> {
        tokio::fs::create_dir_all(staging_dir).await?;

        let path = staging_dir.join(format!("{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;
        debug!("Acquired preview {:?}", path);

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the preview, renaming the staging file to its stable
    /// location. No staging file remains afterwards.
    pub async fn promote(mut self, dest: &Path) -> Result<(), UploadError> {
        tokio::fs::rename(&self.path, dest).await?;
        self.released = true;
        Ok(())
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!("Preview {:?} already gone: {}", self.path, e);
        } else {
            debug!("Released preview {:?}", self.path);
        }
    }
}

impl Drop for PreviewImage {
    fn drop(&mut self) {
        self.release();
    }
}

fn extension_for(content_type: &str) -> &str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|extensions| extensions.first())
            .copied()
            .unwrap_or("img"),
    }
}
