//! Local directory catalog source.

use super::record::{DEFAULT_CATEGORY, EmojiRecord};
use crate::error::{EmojiError, Result};
use serde_json::Map;
use std::path::Path;
use walkdir::WalkDir;

/// Image extensions picked up by a directory scan (lowercase, no dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Whether a path has one of the [`IMAGE_EXTENSIONS`], case-insensitively.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Walk `root` and build one record per image file.
///
/// The category is the file's parent directory relative to `root`
/// (`misc` for files directly under it). Records point at the scanned
/// file in place. The walk runs on the blocking pool.
///
/// # Errors
///
/// Returns an I/O error if `root` cannot be read.
pub async fn scan_directory(root: &Path) -> Result<Vec<EmojiRecord>> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || scan_blocking(&root))
        .await
        .map_err(|e| EmojiError::Io(std::io::Error::other(e)))?
}

fn scan_blocking(root: &Path) -> Result<Vec<EmojiRecord>> {
    // Surface an unreadable root as an error instead of an empty catalog.
    std::fs::read_dir(root)?;

    let mut records = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping unreadable entry during scan: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_image_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let category = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

        records.push(EmojiRecord {
            name: entry.file_name().to_string_lossy().into_owned(),
            category,
            url: format!("file://{}", path.display()),
            local_path: path.to_path_buf(),
            extra: Map::new(),
        });
    }
    Ok(records)
}
