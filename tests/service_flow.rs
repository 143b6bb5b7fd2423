#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use moodmoji::catalog::SnapshotStatus;
use moodmoji::catalog::snapshot::read_snapshot_info;
use moodmoji::{ChannelEventSource, EmojiConfig, EmojiService, OutboundSender, ReplyEvent};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct ChannelSender {
    tx: mpsc::UnboundedSender<PathBuf>,
}

#[async_trait]
impl OutboundSender for ChannelSender {
    async fn send_image(&self, path: &Path) -> anyhow::Result<()> {
        self.tx.send(path.to_path_buf())?;
        Ok(())
    }
}

fn sender() -> (Arc<dyn OutboundSender>, mpsc::UnboundedReceiver<PathBuf>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelSender { tx }), rx)
}

fn config(server: &MockServer, emoji_dir: &Path) -> EmojiConfig {
    let mut config = EmojiConfig {
        send_probability: 1.0,
        emoji_source: format!("{}/catalog.json", server.uri()),
        asset_base_url: server.uri(),
        emoji_dir: Some(emoji_dir.to_path_buf()),
        ..EmojiConfig::default()
    };
    config.selection.diversity_probability = 1.0;
    config
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"name": "开心.gif", "category": "二次元", "url": "./assets/happy.gif", "size": 1024}
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/happy.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF89a".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn remote_catalog_reply_downloads_and_sends() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut service = EmojiService::open_with_seed(config(&server, dir.path()), 7)
        .await
        .unwrap();
    assert_eq!(service.catalog().len(), 1);

    let (sender, mut sent) = sender();
    let event = ReplyEvent::text("哈哈太开心了", Some("今天好开心".into()));
    let handle = service.handle_reply(&event, sender).await.unwrap();
    handle.await.unwrap();

    let path = sent.recv().await.unwrap();
    assert_eq!(path, dir.path().join("二次元").join("开心.gif"));
    assert_eq!(std::fs::read(&path).unwrap(), b"GIF89a");
    assert_eq!(service.usage_history(), vec!["开心.gif二次元".to_owned()]);

    let stats = service.stats().await;
    assert_eq!((stats.total, stats.local_available, stats.remaining), (1, 1, 0));
}

#[tokio::test]
async fn snapshot_is_written_and_reused_when_remote_fails() {
    let dir = tempfile::tempdir().unwrap();

    let good = MockServer::start().await;
    mount_catalog(&good).await;
    let service = EmojiService::open_with_seed(config(&good, dir.path()), 1)
        .await
        .unwrap();
    assert_eq!(service.catalog().len(), 1);
    service.close().await;

    let snapshot = dir.path().join("emoji_cache.json");
    match read_snapshot_info(&snapshot).await.unwrap() {
        SnapshotStatus::Enveloped(info) => assert_eq!(info.total_count, 1),
        other => panic!("unexpected snapshot status: {other:?}"),
    }

    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;
    let service = EmojiService::open_with_seed(config(&broken, dir.path()), 1)
        .await
        .unwrap();
    assert_eq!(service.catalog().len(), 1);
    assert_eq!(service.catalog().records()[0].name, "开心.gif");
    assert_eq!(
        service.catalog().records()[0].extra.get("size"),
        Some(&json!(1024))
    );
}

#[tokio::test]
async fn unreachable_catalog_without_snapshot_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let mut service = EmojiService::open_with_seed(config(&server, dir.path()), 1)
        .await
        .unwrap();
    assert!(service.catalog().is_empty());

    let (sender, mut sent) = sender();
    let event = ReplyEvent::text("哈哈太开心了", None);
    assert!(service.handle_reply(&event, sender).await.is_none());
    assert!(sent.try_recv().is_err());
}

#[tokio::test]
async fn run_loop_sends_through_the_channel() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut service = EmojiService::open_with_seed(config(&server, dir.path()), 3)
        .await
        .unwrap();
    let (tx, mut source) = ChannelEventSource::channel(4);
    tx.send(ReplyEvent::text("谢谢你，太开心了", None))
        .await
        .unwrap();
    drop(tx);

    let (sender, mut sent) = sender();
    assert_eq!(service.run(&mut source, sender).await, 1);

    let path = tokio::time::timeout(Duration::from_secs(5), sent.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(path.ends_with("开心.gif"));
}

#[tokio::test]
async fn clearing_assets_forces_a_fresh_download() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut service = EmojiService::open_with_seed(config(&server, dir.path()), 11)
        .await
        .unwrap();
    let record = service.test_download().await.unwrap();
    assert!(record.local_path.exists());

    assert_eq!(service.clear_local_assets().await.unwrap(), 1);
    assert!(!record.local_path.exists());
    assert!(dir.path().join("emoji_cache.json").exists());

    let record = service.test_download().await.unwrap();
    assert!(record.local_path.exists());
}
