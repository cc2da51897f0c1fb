use crate::services::storage::ImageStore;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Resolves the configured upload directory to an absolute path, creates it
/// if absent (idempotent), and hands back the shared store.
pub async fn setup_storage(upload_dir: &Path) -> Result<Arc<ImageStore>> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("failed to create upload directory {}", upload_dir.display()))?;

    let root = std::path::absolute(upload_dir)
        .with_context(|| format!("failed to resolve upload directory {}", upload_dir.display()))?;
    info!("📁 Image storage: {}", root.display());

    Ok(Arc::new(ImageStore::new(root)))
}
