//! On-disk catalog snapshot.
//!
//! Always written as `{"data": [...], "cache_info": {...}}`. A bare
//! `[...]` array is still accepted on read for older snapshots.

use super::record::{EmojiRecord, records_from_values};
use crate::error::{EmojiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Summary block stored next to the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotInfo {
    /// Number of records in the snapshot.
    pub total_count: usize,
    /// Records whose asset existed on disk at write time.
    pub local_available: usize,
    /// Source descriptor the catalog was ingested from.
    pub source: String,
    /// RFC 3339 timestamp of the write.
    pub last_updated: String,
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    data: &'a [EmojiRecord],
    cache_info: &'a SnapshotInfo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotIn {
    Enveloped {
        data: Vec<Value>,
        #[serde(default)]
        cache_info: Option<SnapshotInfo>,
    },
    Legacy(Vec<Value>),
}

/// What a snapshot file on disk looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// No snapshot file exists.
    Missing,
    /// Older bare-array snapshot without an info block.
    Legacy {
        /// Number of entries in the array.
        count: usize,
    },
    /// Current enveloped snapshot.
    Enveloped(SnapshotInfo),
}

/// Contents of a successfully read snapshot.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// Records in file order.
    pub records: Vec<EmojiRecord>,
    /// Info block, absent for legacy snapshots.
    pub info: Option<SnapshotInfo>,
}

/// Write a snapshot, replacing any previous one via a temp file + rename.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, serialization
/// fails, or the file cannot be written.
pub async fn write_snapshot(path: &Path, records: &[EmojiRecord], info: &SnapshotInfo) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(&SnapshotOut {
        data: records,
        cache_info: info,
    })
    .map_err(std::io::Error::from)?;

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// Read a snapshot. Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`EmojiError::MalformedSource`] when the file is neither an
/// enveloped snapshot nor a bare array, or an I/O error on read failure.
pub async fn read_snapshot(path: &Path) -> Result<Option<LoadedSnapshot>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let (values, info) = match parse(&bytes)? {
        SnapshotIn::Enveloped { data, cache_info } => (data, cache_info),
        SnapshotIn::Legacy(data) => (data, None),
    };

    Ok(Some(LoadedSnapshot {
        records: records_from_values(values),
        info,
    }))
}

/// Inspect the snapshot file without materialising records.
///
/// # Errors
///
/// Same as [`read_snapshot`].
pub async fn read_snapshot_info(path: &Path) -> Result<SnapshotStatus> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SnapshotStatus::Missing),
        Err(e) => return Err(e.into()),
    };

    Ok(match parse(&bytes)? {
        SnapshotIn::Enveloped {
            data: _,
            cache_info: Some(info),
        } => SnapshotStatus::Enveloped(info),
        SnapshotIn::Enveloped {
            data,
            cache_info: None,
        } => SnapshotStatus::Legacy { count: data.len() },
        SnapshotIn::Legacy(data) => SnapshotStatus::Legacy { count: data.len() },
    })
}

fn parse(bytes: &[u8]) -> Result<SnapshotIn> {
    serde_json::from_slice(bytes)
        .map_err(|e| EmojiError::MalformedSource(format!("unreadable snapshot: {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn sample_records(root: &Path) -> Vec<EmojiRecord> {
        vec![
            EmojiRecord::new(root, "a.png", "cats", "https://x/a.png"),
            EmojiRecord::new(root, "b.gif", "misc", "https://x/b.gif"),
            EmojiRecord::new(root, "c.jpg", "", "https://x/c.jpg"),
        ]
    }

    #[tokio::test]
    async fn write_then_read_preserves_records_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emoji_cache.json");
        let records = sample_records(dir.path());
        let info = SnapshotInfo {
            total_count: 3,
            local_available: 0,
            source: "test".into(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };

        write_snapshot(&path, &records, &info).await.unwrap();
        let loaded = read_snapshot(&path).await.unwrap().unwrap();

        assert_eq!(loaded.records.len(), records.len());
        for (a, b) in loaded.records.iter().zip(&records) {
            assert_eq!(a.local_path, b.local_path);
        }
        assert_eq!(loaded.info, Some(info));
        assert!(!dir.path().join("emoji_cache.json.tmp").exists());
    }

    #[tokio::test]
    async fn written_snapshot_uses_envelope_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emoji_cache.json");
        write_snapshot(&path, &sample_records(dir.path()), &SnapshotInfo::default())
            .await
            .unwrap();

        let value: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert!(value["data"].is_array());
        assert!(value["cache_info"]["total_count"].is_number());
        assert!(value["cache_info"]["local_available"].is_number());
    }

    #[tokio::test]
    async fn reads_legacy_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emoji_cache.json");
        std::fs::write(&path, r#"[{"name":"a.png","category":"c"}]"#).unwrap();

        let loaded = read_snapshot(&path).await.unwrap().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.info.is_none());

        let status = read_snapshot_info(&path).await.unwrap();
        assert_eq!(status, SnapshotStatus::Legacy { count: 1 });
    }

    #[tokio::test]
    async fn missing_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(read_snapshot(&path).await.unwrap().is_none());
        assert_eq!(
            read_snapshot_info(&path).await.unwrap(),
            SnapshotStatus::Missing
        );
    }

    #[tokio::test]
    async fn garbage_snapshot_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emoji_cache.json");
        std::fs::write(&path, r#"{"unexpected": true}"#).unwrap();

        let err = read_snapshot(&path).await.unwrap_err();
        assert!(matches!(err, EmojiError::MalformedSource(_)));
    }
}
