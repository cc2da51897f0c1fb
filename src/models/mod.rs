use serde::Serialize;
use utoipa::ToSchema;

/// Metadata for one stored image, derived entirely from the filesystem.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImageRecord {
    pub filename: String,
    /// Absolute path of the image on disk.
    pub path: String,
    /// Absolute path of the storage directory.
    pub folder: String,
    /// Size in bytes.
    pub size: u64,
    /// Size in KiB, rounded to two decimals.
    pub size_kb: f64,
    /// Modification time, `%Y-%m-%d %H:%M:%S` in local time.
    pub time: String,
    /// Relative URL the image can be fetched from.
    pub url: String,
}
