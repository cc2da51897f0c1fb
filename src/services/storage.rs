use crate::models::ImageRecord;
use crate::utils::validation::{has_image_extension, is_safe_filename};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of persisting one captured image.
#[derive(Debug)]
pub struct SavedImage {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Flat-directory image store. Every image lives directly under `root`,
/// named `photo_<YYYYMMDD_HHMMSS>.jpg`.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// `root` should already be absolute; `infrastructure::storage::setup_storage`
    /// resolves and creates it.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage name for a capture taken at `timestamp`. Second precision:
    /// two captures within the same second map to the same name.
    pub fn filename_for(timestamp: DateTime<Local>) -> String {
        format!("photo_{}.jpg", timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Decodes a base64 payload (raw, or a `data:<mime>;base64,<data>` data
    /// URL) and writes the bytes under a timestamp-derived name. An existing
    /// file with the same name is overwritten.
    pub async fn save_base64(&self, payload: &str) -> Result<SavedImage, StoreError> {
        // Drop the data-URL header up to and including the first comma.
        let encoded = match payload.split_once(',') {
            Some((_, rest)) => rest,
            None => payload,
        };
        let bytes = STANDARD.decode(encoded.trim())?;

        let filename = Self::filename_for(Local::now());
        let path = self.root.join(&filename);
        tokio::fs::write(&path, &bytes).await?;

        Ok(SavedImage {
            filename,
            path,
            size: bytes.len() as u64,
        })
    }

    /// Enumerates stored images in descending filename order, which the
    /// timestamp naming scheme makes newest-first.
    pub async fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            // A store nothing was ever written to lists as empty.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !has_image_extension(&filename) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let size = metadata.len();
            let modified: DateTime<Local> = metadata.modified()?.into();
            images.push(ImageRecord {
                url: format!("/image/{filename}"),
                path: entry.path().display().to_string(),
                folder: self.root.display().to_string(),
                size,
                size_kb: (size as f64 / 1024.0 * 100.0).round() / 100.0,
                time: modified.format("%Y-%m-%d %H:%M:%S").to_string(),
                filename,
            });
        }

        images.sort_by(|a, b| b.filename.cmp(&a.filename));
        Ok(images)
    }

    /// Reads one stored image by filename, returning its bytes and content
    /// type. Names with path separators or `..` segments never reach the
    /// filesystem; they are reported as missing.
    pub async fn load(&self, filename: &str) -> Result<(Vec<u8>, &'static str), StoreError> {
        if !is_safe_filename(filename) {
            warn!("Rejected unsafe image filename: {:?}", filename);
            return Err(StoreError::NotFound(filename.to_string()));
        }

        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok((bytes, content_type_for(filename))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}
