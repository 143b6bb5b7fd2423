//! Catalog entry type and the local path derivation rule.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// Category assigned when a source does not provide one.
pub const DEFAULT_CATEGORY: &str = "misc";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

/// One catalog entry describing a single image asset.
///
/// Unknown fields from the origin format are kept in [`extra`](Self::extra)
/// and written back untouched when the catalog is snapshotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiRecord {
    /// File name, unique within a category.
    #[serde(default)]
    pub name: String,
    /// Category, usually the upstream folder name.
    #[serde(default = "default_category")]
    pub category: String,
    /// Source URL. Empty for purely local scans.
    #[serde(default)]
    pub url: String,
    /// Where the asset lives (or will live) on disk. Empty when `name` is empty.
    #[serde(default)]
    pub local_path: PathBuf,
    /// Passthrough fields from the origin format.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmojiRecord {
    /// Build a record with a derived local path and no passthrough fields.
    #[must_use]
    pub fn new(emoji_dir: &Path, name: &str, category: &str, url: &str) -> Self {
        Self {
            name: name.to_owned(),
            category: category.to_owned(),
            url: url.to_owned(),
            local_path: derive_local_path(emoji_dir, name, category),
            extra: Map::new(),
        }
    }

    /// Identity key used by the usage history (`name` + `category`).
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}{}", self.name, self.category)
    }

    /// Whether the record can ever be materialised on disk.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.local_path.as_os_str().is_empty()
    }

    /// Whether the asset file currently exists.
    pub async fn is_local(&self) -> bool {
        self.is_usable()
            && tokio::fs::try_exists(&self.local_path)
                .await
                .unwrap_or(false)
    }

    /// Fill `local_path` from (`name`, `category`) if it is missing.
    pub fn backfill_local_path(&mut self, emoji_dir: &Path) {
        if !self.is_usable() {
            self.local_path = derive_local_path(emoji_dir, &self.name, &self.category);
        }
    }

    /// Lowercased `name category` text used by keyword and anime matching.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.category).to_lowercase()
    }
}

/// Derive the on-disk location of an asset: `<emoji_dir>/<category>/<name>`.
///
/// Pure function of its inputs. Path separators inside `name` are replaced
/// and `..`/root components of `category` are dropped, so catalog data can
/// never point outside `emoji_dir`. An empty `name` yields an empty path.
#[must_use]
pub fn derive_local_path(emoji_dir: &Path, name: &str, category: &str) -> PathBuf {
    if name.is_empty() {
        return PathBuf::new();
    }

    let mut path = emoji_dir.to_path_buf();
    for component in Path::new(&category.replace('\\', "/")).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    path.push(sanitize_file_name(name));
    path
}

fn sanitize_file_name(name: &str) -> String {
    match name {
        "." | ".." => "_".to_owned(),
        other => other.replace(['/', '\\'], "_"),
    }
}

/// Deserialize a list of raw JSON values, skipping entries that are not
/// record objects.
pub fn records_from_values(values: Vec<Value>) -> Vec<EmojiRecord> {
    let total = values.len();
    let records: Vec<EmojiRecord> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() < total {
        tracing::debug!(
            skipped = total - records.len(),
            "skipped catalog entries that are not record objects"
        );
    }
    records
}
