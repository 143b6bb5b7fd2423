//! Catalog statistics and local asset maintenance.

use crate::catalog::Catalog;
use crate::catalog::scan::is_image_file;
use crate::error::{EmojiError, Result};
use crate::history::UsageHistory;
use crate::moodmoji_dirs::SNAPSHOT_FILE_NAME;
use crate::ranker::is_anime_tagged;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// Point-in-time counts over the catalog and usage history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    /// Records whose asset exists on disk.
    pub local_available: usize,
    /// Records the anime heuristic accepts.
    pub anime: usize,
    /// `local_available / total`, `0.0` for an empty catalog.
    pub download_ratio: f64,
    /// `anime / total`, `0.0` for an empty catalog.
    pub anime_ratio: f64,
    /// Records not yet downloaded.
    pub remaining: usize,
    pub history_len: usize,
    pub history_capacity: usize,
}

impl CatalogStats {
    /// Gather stats. Checks the filesystem once per record.
    pub async fn collect(catalog: &Catalog, history: &UsageHistory) -> Self {
        let total = catalog.len();
        let local_available = catalog.local_available().await;
        let anime = catalog
            .records()
            .iter()
            .filter(|r| is_anime_tagged(r))
            .count();

        Self {
            total,
            local_available,
            anime,
            download_ratio: ratio(local_available, total),
            anime_ratio: ratio(anime, total),
            remaining: total - local_available,
            history_len: history.len(),
            history_capacity: history.capacity(),
        }
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Delete every downloaded asset under `emoji_dir`, keeping the catalog
/// snapshot. Returns the number of image files removed; a missing
/// directory removes nothing.
///
/// # Errors
///
/// Returns an I/O error if an entry cannot be removed.
pub async fn clear_local_assets(emoji_dir: &Path) -> Result<usize> {
    let emoji_dir = emoji_dir.to_path_buf();
    let removed = tokio::task::spawn_blocking(move || clear_blocking(&emoji_dir))
        .await
        .map_err(|e| EmojiError::Io(std::io::Error::other(e)))??;
    tracing::info!(removed, "cleared local emoji assets");
    Ok(removed)
}

fn clear_blocking(emoji_dir: &Path) -> Result<usize> {
    if !emoji_dir.is_dir() {
        return Ok(0);
    }

    let images = WalkDir::new(emoji_dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_image_file(e.path()))
        .count();

    for entry in std::fs::read_dir(emoji_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&path)?;
        } else if entry.file_name() != SNAPSHOT_FILE_NAME {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(images)
}
