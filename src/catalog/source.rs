//! Catalog source classification and payload decoding.

use super::record::{EmojiRecord, records_from_values};
use crate::error::{EmojiError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where a catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// HTTP(S) endpoint serving catalog JSON.
    Remote(String),
    /// Local catalog JSON file.
    JsonFile(PathBuf),
    /// Local directory of images to scan.
    Directory(PathBuf),
    /// Reuse the on-disk snapshot.
    Cached,
}

impl SourceKind {
    /// Classify a source descriptor.
    ///
    /// Priority: empty → cached; `http(s)://` → remote; existing `.json`
    /// file → JSON file; existing directory → scan. Anything else reuses
    /// the snapshot when one exists and is otherwise treated as a URL.
    pub async fn detect(descriptor: &str, snapshot_path: &Path) -> Self {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Self::Cached;
        }
        if descriptor.starts_with("http://") || descriptor.starts_with("https://") {
            return Self::Remote(descriptor.to_owned());
        }

        let path = PathBuf::from(descriptor);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() && descriptor.ends_with(".json") => {
                return Self::JsonFile(path);
            }
            Ok(meta) if meta.is_dir() => return Self::Directory(path),
            _ => {}
        }

        if tokio::fs::try_exists(snapshot_path).await.unwrap_or(false) {
            Self::Cached
        } else {
            Self::Remote(descriptor.to_owned())
        }
    }

    /// Short label used in logs and snapshot provenance.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Remote(_) => "url",
            Self::JsonFile(_) => "json_file",
            Self::Directory(_) => "directory",
            Self::Cached => "cached",
        }
    }
}

/// Decode a catalog payload: a bare array of records or `{"data": [...]}`.
///
/// # Errors
///
/// Returns [`EmojiError::MalformedSource`] for any other JSON shape.
pub fn decode_payload(value: Value) -> Result<Vec<EmojiRecord>> {
    match value {
        Value::Array(items) => Ok(records_from_values(items)),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(records_from_values(items)),
            _ => Err(EmojiError::MalformedSource(
                "expected an array or an object with a `data` array".into(),
            )),
        },
        _ => Err(EmojiError::MalformedSource(
            "expected an array or an object with a `data` array".into(),
        )),
    }
}

/// Resolve a possibly relative asset URL against `base`.
///
/// Absolute `http...` URLs are returned unchanged; relative ones have any
/// leading `.`/`/` characters stripped before joining.
#[must_use]
pub fn resolve_asset_url(url: &str, base: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        return url.to_owned();
    }
    let relative = url.trim_start_matches(['.', '/']);
    if base.ends_with('/') {
        format!("{base}{relative}")
    } else {
        format!("{base}/{relative}")
    }
}
