//! Catalog store: ingestion, in-memory catalog and on-disk snapshot.
//!
//! A catalog is replaced wholesale on every ingestion. Remote ingestion
//! persists a snapshot on success and falls back to the last snapshot on
//! any failure; when both fail the catalog is empty and every downstream
//! operation becomes a no-op.

pub mod record;
pub mod scan;
pub mod snapshot;
pub mod source;

pub use record::{DEFAULT_CATEGORY, EmojiRecord, derive_local_path};
pub use snapshot::{SnapshotInfo, SnapshotStatus};
pub use source::SourceKind;

use crate::config::EmojiConfig;
use crate::error::{EmojiError, Result};
use crate::moodmoji_dirs::SNAPSHOT_FILE_NAME;
use std::path::{Path, PathBuf};

/// Ordered list of catalog records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EmojiRecord>,
}

impl Catalog {
    /// Wrap a list of records.
    #[must_use]
    pub fn new(records: Vec<EmojiRecord>) -> Self {
        Self { records }
    }

    /// All records in ingestion order.
    #[must_use]
    pub fn records(&self) -> &[EmojiRecord] {
        &self.records
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose asset currently exists on disk.
    pub async fn local_available(&self) -> usize {
        self.local_presence().await.into_iter().filter(|&p| p).count()
    }

    /// Per-record on-disk presence, in record order.
    ///
    /// All paths are checked in one pass on the blocking pool. If that task
    /// fails, every record is reported absent.
    pub async fn local_presence(&self) -> Vec<bool> {
        let paths: Vec<PathBuf> = self.records.iter().map(|r| r.local_path.clone()).collect();
        let count = paths.len();
        match tokio::task::spawn_blocking(move || {
            paths
                .iter()
                .map(|p| !p.as_os_str().is_empty() && p.try_exists().unwrap_or(false))
                .collect::<Vec<bool>>()
        })
        .await
        {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!("local presence check failed: {e}");
                vec![false; count]
            }
        }
    }
}

/// Where the current catalog was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrigin {
    /// Nothing ingested yet, or every source failed.
    #[default]
    Empty,
    Remote,
    Snapshot,
    /// A local JSON file or directory scan.
    Local,
}

impl CatalogOrigin {
    /// Whether this catalog may overwrite the snapshot. Local sources never
    /// replace the remote fallback.
    #[must_use]
    pub fn backs_snapshot(self) -> bool {
        matches!(self, Self::Remote | Self::Snapshot)
    }
}

/// Owns the in-memory catalog and its snapshot file.
pub struct CatalogStore {
    emoji_dir: PathBuf,
    snapshot_path: PathBuf,
    asset_base_url: String,
    client: reqwest::Client,
    catalog: Catalog,
    source: String,
    origin: CatalogOrigin,
}

impl CatalogStore {
    /// Create an empty store rooted at the configured asset directory.
    ///
    /// # Errors
    ///
    /// Returns [`EmojiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EmojiConfig) -> Result<Self> {
        let emoji_dir = config.resolved_emoji_dir();
        Ok(Self {
            snapshot_path: emoji_dir.join(SNAPSHOT_FILE_NAME),
            emoji_dir,
            asset_base_url: config.asset_base_url.clone(),
            client: crate::http::build_client(config)?,
            catalog: Catalog::default(),
            source: String::new(),
            origin: CatalogOrigin::Empty,
        })
    }

    /// The current catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    /// Asset directory root.
    #[must_use]
    pub fn emoji_dir(&self) -> &Path {
        &self.emoji_dir
    }

    /// Snapshot file location.
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Ingest a catalog from `descriptor` (see [`SourceKind::detect`]).
    ///
    /// # Errors
    ///
    /// - [`EmojiError::SourceUnreachable`] when a remote fetch fails and no
    ///   snapshot can stand in (the catalog is left empty)
    /// - [`EmojiError::MalformedSource`] when a local JSON file has an
    ///   unsupported shape (the catalog is left unchanged)
    /// - I/O errors from reading local sources
    pub async fn ingest(&mut self, descriptor: &str) -> Result<&Catalog> {
        tokio::fs::create_dir_all(&self.emoji_dir).await?;

        let kind = SourceKind::detect(descriptor, &self.snapshot_path).await;
        tracing::info!(source = kind.label(), "detected catalog source");

        match kind {
            SourceKind::Cached => {
                if !self.load_snapshot().await {
                    self.reset();
                    return Err(EmojiError::SourceUnreachable(
                        "no catalog source configured and no snapshot available".into(),
                    ));
                }
            }
            SourceKind::Remote(url) => match self.fetch_remote(&url).await {
                Ok(records) => {
                    self.replace(records, &url, CatalogOrigin::Remote);
                    tracing::info!(count = self.catalog.len(), "loaded remote catalog");
                    self.persist_logged().await;
                }
                Err(e) => {
                    tracing::warn!("remote catalog fetch failed: {e}; trying snapshot");
                    if !self.load_snapshot().await {
                        tracing::warn!("no usable catalog data");
                        self.reset();
                        return Err(e);
                    }
                }
            },
            SourceKind::JsonFile(path) => {
                let records = self.read_json_file(&path).await?;
                self.replace(records, &path.to_string_lossy(), CatalogOrigin::Local);
                tracing::info!(count = self.catalog.len(), "loaded catalog from JSON file");
            }
            SourceKind::Directory(root) => {
                let records = scan::scan_directory(&root).await?;
                self.replace(records, &root.to_string_lossy(), CatalogOrigin::Local);
                tracing::info!(count = self.catalog.len(), "scanned catalog directory");
            }
        }

        Ok(&self.catalog)
    }

    /// Write the whole catalog plus counts to the snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub async fn persist_snapshot(&self) -> Result<()> {
        let info = SnapshotInfo {
            total_count: self.catalog.len(),
            local_available: self.catalog.local_available().await,
            source: self.source.clone(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        };
        snapshot::write_snapshot(&self.snapshot_path, self.catalog.records(), &info).await?;
        tracing::info!(
            total = info.total_count,
            local = info.local_available,
            "catalog snapshot saved to {}",
            self.snapshot_path.display()
        );
        Ok(())
    }

    /// Persist the snapshot if the catalog came from the remote source or
    /// the snapshot itself. Returns whether a write was attempted.
    pub async fn persist_if_snapshot_backed(&self) -> bool {
        if self.catalog.is_empty() || !self.origin.backs_snapshot() {
            tracing::debug!(origin = ?self.origin, "catalog not snapshot-backed, skipping save");
            return false;
        }
        self.persist_logged().await;
        true
    }

    /// Persist the snapshot, logging instead of failing.
    pub async fn persist_logged(&self) {
        if let Err(e) = self.persist_snapshot().await {
            tracing::warn!("failed to save catalog snapshot: {e}");
        }
    }

    /// Replace the catalog with the snapshot contents.
    ///
    /// Returns `false` (leaving the catalog untouched) when the snapshot is
    /// missing, unreadable or empty.
    pub async fn load_snapshot(&mut self) -> bool {
        let loaded = match snapshot::read_snapshot(&self.snapshot_path).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("failed to load catalog snapshot: {e}");
                return false;
            }
        };
        if loaded.records.is_empty() {
            return false;
        }

        let mut records = loaded.records;
        for record in &mut records {
            record.backfill_local_path(&self.emoji_dir);
        }
        let source = loaded
            .info
            .map(|info| info.source)
            .unwrap_or_else(|| SNAPSHOT_FILE_NAME.to_owned());
        self.replace(records, &source, CatalogOrigin::Snapshot);

        tracing::info!(
            total = self.catalog.len(),
            local = self.catalog.local_available().await,
            "loaded catalog snapshot"
        );
        true
    }

    fn replace(&mut self, records: Vec<EmojiRecord>, source: &str, origin: CatalogOrigin) {
        self.catalog = Catalog::new(records);
        self.source = source.to_owned();
        self.origin = origin;
    }

    fn reset(&mut self) {
        self.replace(Vec::new(), "", CatalogOrigin::Empty);
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<EmojiRecord>> {
        tracing::info!("requesting catalog from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EmojiError::SourceUnreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(EmojiError::SourceUnreachable(format!(
                "{url}: HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| EmojiError::SourceUnreachable(format!("{url}: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| EmojiError::MalformedSource(format!("{url}: {e}")))?;

        let mut records = source::decode_payload(value)?;
        for record in &mut records {
            record.url = source::resolve_asset_url(&record.url, &self.asset_base_url);
            record.local_path = derive_local_path(&self.emoji_dir, &record.name, &record.category);
        }
        Ok(records)
    }

    async fn read_json_file(&self, path: &Path) -> Result<Vec<EmojiRecord>> {
        let bytes = tokio::fs::read(path).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| EmojiError::MalformedSource(format!("{}: {e}", path.display())))?;

        let mut records = source::decode_payload(value)?;
        for record in &mut records {
            record.backfill_local_path(&self.emoji_dir);
        }
        Ok(records)
    }
}
