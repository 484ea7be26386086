//! # vs-storage-local
//!
//! Local filesystem implementation of `MediaStore`.
//! Content-addressable storage with directory sharding. Thumbnails are
//! decoded, bounded and re-encoded as WebP before they are stored.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use mime::Mime;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, error, info, warn};
use vs_core::error::{AppError, Result};
use vs_core::traits::{MediaKind, MediaStore, StoredMedia};

pub const MAX_THUMBNAIL_WIDTH: u32 = 1280;
pub const MAX_THUMBNAIL_HEIGHT: u32 = 720;

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/media")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/media")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root_path: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// "ab/cd/abcd...hash.ext"
    fn sharded_path(hash: &str, extension: &str) -> String {
        format!("{}/{}/{hash}.{extension}", &hash[0..2], &hash[2..4])
    }

    fn url_for(&self, relative: &str) -> String {
        format!("{}/{relative}", self.url_prefix)
    }

    /// Writes through a temporary file so readers never see a partial upload.
    /// Identical content is already stored under the same name and is skipped.
    async fn persist(&self, relative: &str, data: &[u8]) -> anyhow::Result<bool> {
        let target = self.root_path.join(relative);
        if fs::try_exists(&target).await? {
            return Ok(false);
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let part = target.with_extension(format!(
            "{}.{}.part",
            std::process::id(),
            PART_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&part, data).await?;
        fs::rename(&part, &target).await?;
        Ok(true)
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Saves an upload using its SHA-256 hash as the filename.
    /// This automatically deduplicates files.
    async fn upload(&self, kind: MediaKind, data: Bytes, content_type: &Mime) -> Result<StoredMedia> {
        if data.is_empty() {
            return Err(AppError::invalid("Uploaded file is empty"));
        }
        let hash = hex::encode(Sha256::digest(&data));

        let (relative, payload) = match kind {
            MediaKind::Video => (Self::sharded_path(&hash, &extension_for(content_type)), data),
            MediaKind::Thumbnail => {
                let encoded = tokio::task::spawn_blocking(move || render_thumbnail(&data))
                    .await
                    .map_err(|err| AppError::internal(format!("thumbnail task failed: {err}")))?
                    .map_err(|err| {
                        warn!(error = %err, "thumbnail could not be decoded");
                        AppError::invalid("Thumbnail is not a readable image")
                    })?;
                (Self::sharded_path(&hash, "webp"), Bytes::from(encoded))
            }
        };

        let written = self.persist(&relative, &payload).await.map_err(|err| {
            error!(error = %err, path = %relative, "failed to store media");
            AppError::Storage(err)
        })?;
        if written {
            info!(?kind, path = %relative, bytes = payload.len(), "media stored");
        } else {
            debug!(?kind, path = %relative, "media already stored");
        }

        Ok(StoredMedia {
            url: self.url_for(&relative),
            duration: None,
        })
    }
}

/// File extension for a stored original. The subtype wins when it is itself
/// a known extension of the type (`video/mp4` -> `mp4`).
fn extension_for(content_type: &Mime) -> String {
    let subtype = content_type.subtype().as_str();
    let known = mime_guess::get_mime_extensions(content_type).unwrap_or_default();
    if known.iter().any(|extension| *extension == subtype) {
        return subtype.to_string();
    }
    match known.first() {
        Some(extension) => extension.to_string(),
        None if !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()) => {
            subtype.to_string()
        }
        None => "bin".to_string(),
    }
}

/// Bounds the image to 1280x720 (never upscaling) and encodes it as WebP.
fn render_thumbnail(data: &[u8]) -> image::ImageResult<Vec<u8>> {
    let decoded = image::load_from_memory(data)?;
    let bounded = if decoded.width() > MAX_THUMBNAIL_WIDTH || decoded.height() > MAX_THUMBNAIL_HEIGHT {
        decoded.thumbnail(MAX_THUMBNAIL_WIDTH, MAX_THUMBNAIL_HEIGHT)
    } else {
        decoded
    };

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(bounded.to_rgba8()).write_to(&mut out, ImageFormat::WebP)?;
    Ok(out.into_inner())
}
