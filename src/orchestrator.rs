//! Send orchestration: reply text in, image path out.
//!
//! [`EmojiService`] owns the catalog, mood and usage history and is the
//! only component that talks to the host collaborators. Events are
//! handled one at a time; mood and history are updated before the send is
//! dispatched, so later events always see the latest state.
//!
//! # Delivery contract
//!
//! Sends run as detached tokio tasks: best effort, never cancelled, and
//! their errors are logged rather than returned. A turn that produces no
//! image is silent by design; the host's own reply is never affected.

use crate::catalog::{Catalog, CatalogStore, EmojiRecord};
use crate::config::EmojiConfig;
use crate::download::Downloader;
use crate::emotion::{classify_reply_with, classify_user_message};
use crate::error::{EmojiError, Result};
use crate::mood::MoodTracker;
use crate::ranker::CandidateRanker;
use crate::stats::{self, CatalogStats};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One segment of a generated reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyPart {
    Text { text: String },
    /// Non-text content (images, mentions, ...), ignored for classification.
    #[serde(other)]
    Other,
}

/// A generated reply plus, optionally, the message it answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEvent {
    #[serde(default)]
    pub parts: Vec<ReplyPart>,
    #[serde(default)]
    pub user_message: Option<String>,
}

impl ReplyEvent {
    /// Single-part text reply.
    #[must_use]
    pub fn text(reply: impl Into<String>, user_message: Option<String>) -> Self {
        Self {
            parts: vec![ReplyPart::Text {
                text: reply.into(),
            }],
            user_message,
        }
    }

    /// Text parts concatenated in order.
    #[must_use]
    pub fn reply_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ReplyPart::Text { text } => Some(text.as_str()),
                ReplyPart::Other => None,
            })
            .collect()
    }
}

/// Delivers an image to the end user, independently of the main reply.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    async fn send_image(&self, path: &Path) -> anyhow::Result<()>;
}

/// Supplies reply events; `None` ends the stream.
#[async_trait]
pub trait InboundEventSource: Send {
    async fn next_event(&mut self) -> Option<ReplyEvent>;
}

/// [`InboundEventSource`] backed by a tokio channel.
pub struct ChannelEventSource {
    rx: mpsc::Receiver<ReplyEvent>,
}

impl ChannelEventSource {
    #[must_use]
    pub fn new(rx: mpsc::Receiver<ReplyEvent>) -> Self {
        Self { rx }
    }

    /// Create a bounded channel and its source.
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<ReplyEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl InboundEventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<ReplyEvent> {
        self.rx.recv().await
    }
}

/// The emoji pipeline as an owned service object.
pub struct EmojiService {
    config: EmojiConfig,
    store: CatalogStore,
    mood: MoodTracker,
    ranker: CandidateRanker,
    rng: StdRng,
}

impl EmojiService {
    /// Validate `config`, build the service and ingest the configured catalog.
    ///
    /// A catalog that cannot be loaded is logged, not returned: the service
    /// still opens and every turn is a no-op until a catalog exists.
    ///
    /// # Errors
    ///
    /// Returns [`EmojiError::Config`] for invalid configuration or
    /// [`EmojiError::Http`] if the HTTP client cannot be built.
    pub async fn open(config: EmojiConfig) -> Result<Self> {
        Self::build(config, None).await
    }

    /// Like [`open`](Self::open) with every random decision seeded.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub async fn open_with_seed(config: EmojiConfig, seed: u64) -> Result<Self> {
        Self::build(config, Some(seed)).await
    }

    async fn build(config: EmojiConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;

        let mut store = CatalogStore::new(&config)?;
        let downloader = Downloader::new(&config)?;
        let (mood, ranker, rng) = match seed {
            Some(seed) => (
                MoodTracker::with_seed(&config.mood, seed),
                CandidateRanker::with_seed(&config.selection, downloader, seed.wrapping_add(1)),
                StdRng::seed_from_u64(seed.wrapping_add(2)),
            ),
            None => (
                MoodTracker::new(&config.mood),
                CandidateRanker::new(&config.selection, downloader),
                StdRng::from_entropy(),
            ),
        };

        if let Err(e) = store.ingest(&config.emoji_source).await {
            tracing::warn!("emoji catalog unavailable, sending disabled: {e}");
        }
        tracing::info!(
            total = store.catalog().len(),
            local = store.catalog().local_available().await,
            dir = %store.emoji_dir().display(),
            "emoji service opened"
        );

        Ok(Self {
            config,
            store,
            mood,
            ranker,
            rng,
        })
    }

    /// Shut the service down, saving the latest local counts when the
    /// catalog came from the remote source or its snapshot.
    pub async fn close(self) {
        self.store.persist_if_snapshot_backed().await;
        tracing::info!("emoji service closed");
    }

    /// Process one reply event.
    ///
    /// Returns the handle of the spawned send task, or `None` when this
    /// turn sends nothing. Dropping the handle detaches the task.
    pub async fn handle_reply(
        &mut self,
        event: &ReplyEvent,
        sender: Arc<dyn OutboundSender>,
    ) -> Option<JoinHandle<()>> {
        if !self.config.enable_context_parsing {
            return None;
        }
        let reply = event.reply_text();
        if reply.trim().is_empty() {
            return None;
        }

        let ai_emotion = classify_reply_with(&reply, &mut self.rng);
        let user_emotion = classify_user_message(event.user_message.as_deref().unwrap_or(""));
        self.mood.update(user_emotion, ai_emotion, &reply);

        if !self.rng.gen_bool(self.config.send_probability.clamp(0.0, 1.0)) {
            tracing::debug!(%ai_emotion, "send gate closed for this turn");
            return None;
        }

        let mood = self.mood.current_mood();
        let record = self
            .ranker
            .select_for_turn(self.store.catalog(), mood, user_emotion)
            .await;
        let Some(record) = record else {
            let e = EmojiError::NoCandidateFound(format!("mood {mood}"));
            tracing::info!("{e}");
            return None;
        };

        tracing::info!(name = %record.name, %mood, "dispatching emoji send");
        Some(tokio::spawn(deliver(record, sender)))
    }

    /// Drain `source`, handling events in arrival order. Returns the number
    /// of events handled once the source is closed and every send it
    /// dispatched has finished.
    pub async fn run<S>(&mut self, source: &mut S, sender: Arc<dyn OutboundSender>) -> usize
    where
        S: InboundEventSource + ?Sized,
    {
        let mut handled = 0;
        let mut dispatched = 0;
        let mut pending: Vec<JoinHandle<()>> = Vec::new();
        while let Some(event) = source.next_event().await {
            if let Some(handle) = self.handle_reply(&event, Arc::clone(&sender)).await {
                pending.push(handle);
                dispatched += 1;
            }
            pending.retain(|handle| !handle.is_finished());
            handled += 1;
        }
        tracing::info!(handled, dispatched, "event source closed");

        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!("emoji send task failed: {e}");
            }
        }
        handled
    }

    /// Download one random catalog record to check connectivity.
    ///
    /// # Errors
    ///
    /// - [`EmojiError::NoCandidateFound`] if the catalog is empty
    /// - [`EmojiError::SourceUnreachable`] if the download fails
    pub async fn test_download(&mut self) -> Result<EmojiRecord> {
        let record = self
            .store
            .catalog()
            .records()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| EmojiError::NoCandidateFound("catalog is empty".into()))?;

        tracing::info!(name = %record.name, "test download");
        if self.ranker.downloader().fetch(&record).await {
            Ok(record)
        } else {
            Err(EmojiError::SourceUnreachable(format!(
                "test download failed: {}",
                record.name
            )))
        }
    }

    /// Recently used identities, most recent first.
    #[must_use]
    pub fn usage_history(&self) -> Vec<String> {
        self.ranker.history().snapshot()
    }

    /// Forget the usage history, returning how many entries were dropped.
    pub fn clear_usage_history(&mut self) -> usize {
        let cleared = self.ranker.history_mut().clear();
        tracing::info!(cleared, "usage history cleared");
        cleared
    }

    /// Current catalog statistics.
    pub async fn stats(&self) -> CatalogStats {
        CatalogStats::collect(self.store.catalog(), self.ranker.history()).await
    }

    /// Delete downloaded assets; they are fetched again on demand.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an asset cannot be removed.
    pub async fn clear_local_assets(&self) -> Result<usize> {
        stats::clear_local_assets(self.store.emoji_dir()).await
    }

    #[must_use]
    pub fn mood(&self) -> &MoodTracker {
        &self.mood
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    #[must_use]
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &EmojiConfig {
        &self.config
    }
}

/// Send task body. Never returns an error.
async fn deliver(record: EmojiRecord, sender: Arc<dyn OutboundSender>) {
    let path: PathBuf = record.local_path;
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        let e = EmojiError::AssetMissingLocally(path.display().to_string());
        tracing::error!(name = %record.name, "{e}; skipping send");
        return;
    }
    match sender.send_image(&path).await {
        Ok(()) => tracing::info!(name = %record.name, "emoji sent"),
        Err(e) => tracing::warn!(name = %record.name, "emoji send failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl OutboundSender for RecordingSender {
        async fn send_image(&self, path: &Path) -> anyhow::Result<()> {
            self.sent.lock().await.push(path.to_path_buf());
            Ok(())
        }
    }

    struct FailingSender;

    #[async_trait]
    impl OutboundSender for FailingSender {
        async fn send_image(&self, _path: &Path) -> anyhow::Result<()> {
            anyhow::bail!("host rejected image")
        }
    }

    fn config_for(dir: &Path, source: &Path) -> EmojiConfig {
        EmojiConfig {
            send_probability: 1.0,
            emoji_source: source.display().to_string(),
            emoji_dir: Some(dir.to_path_buf()),
            ..EmojiConfig::default()
        }
    }

    fn populate(root: &Path, count: usize) {
        let category = root.join("二次元");
        std::fs::create_dir_all(&category).unwrap();
        for i in 0..count {
            std::fs::write(category.join(format!("开心{i}.png")), b"img").unwrap();
        }
    }

    #[test]
    fn reply_text_joins_text_parts() {
        let event = ReplyEvent {
            parts: vec![
                ReplyPart::Text { text: "哈哈".into() },
                ReplyPart::Other,
                ReplyPart::Text { text: "太好了".into() },
            ],
            user_message: None,
        };
        assert_eq!(event.reply_text(), "哈哈太好了");
    }

    #[test]
    fn reply_event_parses_from_json() {
        let event: ReplyEvent = serde_json::from_str(
            r#"{"parts":[{"type":"text","text":"hi"},{"type":"image"}],"user_message":"yo"}"#,
        )
        .unwrap();
        assert_eq!(event.parts.len(), 2);
        assert_eq!(event.parts[1], ReplyPart::Other);
        assert_eq!(event.user_message.as_deref(), Some("yo"));
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_at_open() {
        let config = EmojiConfig {
            send_probability: 2.0,
            ..EmojiConfig::default()
        };
        let result = EmojiService::open(config).await;
        assert!(matches!(result, Err(EmojiError::Config(_))));
    }

    #[tokio::test]
    async fn empty_catalog_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::create_dir_all(&source).unwrap();

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 1)
            .await
            .unwrap();
        assert!(service.catalog().is_empty());

        let sender = Arc::new(RecordingSender::default());
        let event = ReplyEvent::text("哈哈太开心了", None);
        assert!(service.handle_reply(&event, sender.clone()).await.is_none());
        assert!(sender.sent.lock().await.is_empty());
        assert_eq!(service.mood().context_len(), 1);
    }

    #[tokio::test]
    async fn blank_reply_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 1)
            .await
            .unwrap();
        let sender = Arc::new(RecordingSender::default());
        let event = ReplyEvent::text("   ", Some("hello".into()));
        assert!(service.handle_reply(&event, sender).await.is_none());
        assert_eq!(service.mood().context_len(), 0);
    }

    #[tokio::test]
    async fn reply_sends_a_local_image() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 3)
            .await
            .unwrap();
        assert_eq!(service.catalog().len(), 10);

        let sender = Arc::new(RecordingSender::default());
        let event = ReplyEvent::text("哈哈太开心了", Some("今天好开心".into()));
        let handle = service.handle_reply(&event, sender.clone()).await.unwrap();
        handle.await.unwrap();

        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with(&source));
        assert_eq!(service.usage_history().len(), 1);
    }

    #[tokio::test]
    async fn disabled_parsing_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut config = config_for(dir.path(), &source);
        config.enable_context_parsing = false;
        let mut service = EmojiService::open_with_seed(config, 3).await.unwrap();

        let sender = Arc::new(RecordingSender::default());
        let event = ReplyEvent::text("哈哈太开心了", None);
        assert!(service.handle_reply(&event, sender).await.is_none());
        assert_eq!(service.mood().context_len(), 0);
    }

    #[tokio::test]
    async fn closed_gate_updates_mood_only() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut config = config_for(dir.path(), &source);
        config.send_probability = 0.0;
        let mut service = EmojiService::open_with_seed(config, 3).await.unwrap();

        let sender = Arc::new(RecordingSender::default());
        let event = ReplyEvent::text("哈哈太开心了", None);
        assert!(service.handle_reply(&event, sender).await.is_none());
        assert_eq!(service.mood().context_len(), 1);
        assert!(service.usage_history().is_empty());
    }

    #[tokio::test]
    async fn send_failure_is_absorbed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 5)
            .await
            .unwrap();
        let event = ReplyEvent::text("哈哈太开心了", None);
        let handle = service
            .handle_reply(&event, Arc::new(FailingSender))
            .await
            .unwrap();
        // The task completes normally; the error only reaches the log.
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn missing_asset_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(dir.path(), "gone.png", "misc", "");
        let sender = Arc::new(RecordingSender::default());
        deliver(record, sender.clone()).await;
        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn run_drains_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 9)
            .await
            .unwrap();
        let (tx, mut events) = ChannelEventSource::channel(8);
        tx.send(ReplyEvent::text("哈哈", None)).await.unwrap();
        tx.send(ReplyEvent::text("", None)).await.unwrap();
        tx.send(ReplyEvent::text("谢谢你", None)).await.unwrap();
        drop(tx);

        let sender = Arc::new(RecordingSender::default());
        let handled = service.run(&mut events, sender.clone()).await;
        assert_eq!(handled, 3);
        assert_eq!(service.mood().context_len(), 2);
        // Sends dispatched by the loop have landed by the time it returns.
        assert_eq!(sender.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn usage_history_can_be_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 10);

        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 3)
            .await
            .unwrap();
        let sender = Arc::new(RecordingSender::default());
        for _ in 0..3 {
            let event = ReplyEvent::text("哈哈太开心了", None);
            if let Some(handle) = service.handle_reply(&event, sender.clone()).await {
                handle.await.unwrap();
            }
        }
        let before = service.usage_history().len();
        assert!(before > 0);
        assert_eq!(service.clear_usage_history(), before);
        assert!(service.usage_history().is_empty());
    }

    #[tokio::test]
    async fn close_on_directory_source_writes_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 2);
        let assets = dir.path().join("assets");

        let service = EmojiService::open_with_seed(config_for(&assets, &source), 1)
            .await
            .unwrap();
        let snapshot = service.store().snapshot_path().to_path_buf();
        service.close().await;
        assert!(!snapshot.exists());
    }

    #[tokio::test]
    async fn close_on_directory_source_keeps_remote_snapshot() {
        use crate::catalog::snapshot::{
            SnapshotInfo, SnapshotStatus, read_snapshot_info, write_snapshot,
        };

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 2);
        let assets = dir.path().join("assets");
        let snapshot = assets.join(crate::moodmoji_dirs::SNAPSHOT_FILE_NAME);
        let remote = vec![EmojiRecord::new(&assets, "r.gif", "二次元", "https://x/r.gif")];
        let info = SnapshotInfo {
            total_count: 1,
            source: "https://catalog.example/list.json".into(),
            ..SnapshotInfo::default()
        };
        write_snapshot(&snapshot, &remote, &info).await.unwrap();

        let service = EmojiService::open_with_seed(config_for(&assets, &source), 1)
            .await
            .unwrap();
        assert_eq!(service.catalog().len(), 2);
        service.close().await;

        match read_snapshot_info(&snapshot).await.unwrap() {
            SnapshotStatus::Enveloped(saved) => {
                assert_eq!(saved.total_count, 1);
                assert_eq!(saved.source, "https://catalog.example/list.json");
            }
            other => panic!("unexpected snapshot status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_on_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 1)
            .await
            .unwrap();
        assert!(matches!(
            service.test_download().await,
            Err(EmojiError::NoCandidateFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_of_local_record_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        populate(&source, 2);
        let mut service = EmojiService::open_with_seed(config_for(dir.path(), &source), 1)
            .await
            .unwrap();
        let record = service.test_download().await.unwrap();
        assert!(record.local_path.exists());
    }
}
