//! Headless host for the emoji pipeline.
//!
//! Reads reply events as newline-delimited JSON from stdin:
//!
//! ```text
//! {"parts":[{"type":"text","text":"哈哈太开心了"}],"user_message":"今天好开心"}
//! ```
//!
//! and writes one `{"event":"send_image","path":"..."}` line to stdout for
//! every image the service decides to send. All tracing output goes to
//! stderr so that stdout stays a clean JSON channel.
//!
//! The config file is taken from `MOODMOJI_CONFIG`, then the default config
//! path; built-in defaults apply when neither exists.

use async_trait::async_trait;
use moodmoji::{ChannelEventSource, EmojiConfig, EmojiService, OutboundSender, ReplyEvent};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, mpsc};

/// Reply events buffered between the stdin reader and the service.
const EVENT_CAPACITY: usize = 64;

#[derive(Serialize)]
struct SendImageEvent<'a> {
    event: &'static str,
    path: &'a Path,
}

struct StdoutSender {
    writer: Mutex<BufWriter<tokio::io::Stdout>>,
}

#[async_trait]
impl OutboundSender for StdoutSender {
    async fn send_image(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string(&SendImageEvent {
            event: "send_image",
            path,
        })?;
        let mut writer = self.writer.lock().await;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

fn load_config() -> anyhow::Result<EmojiConfig> {
    let path = std::env::var_os("MOODMOJI_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(EmojiConfig::default_config_path);
    if path.is_file() {
        tracing::info!("loading config from {}", path.display());
        Ok(EmojiConfig::from_file(&path)?)
    } else {
        tracing::info!("no config at {}, using defaults", path.display());
        Ok(EmojiConfig::default())
    }
}

/// Read reply events from stdin until EOF or until the service stops
/// listening. Unparseable lines are logged and skipped.
async fn read_events(tx: mpsc::Sender<ReplyEvent>) -> anyhow::Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            tracing::info!("stdin closed (EOF); shutting down");
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event: ReplyEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, raw_line = %trimmed, "failed to parse reply event");
                continue;
            }
        };
        if tx.send(event).await.is_err() {
            tracing::warn!("event loop closed; dropping remaining input");
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("moodmoji-host starting");

    let config = load_config()?;
    let mut service = EmojiService::open(config).await.map_err(|e| {
        tracing::error!(error = %e, "failed to open emoji service");
        anyhow::anyhow!("moodmoji-host failed: {e}")
    })?;

    let sender: Arc<dyn OutboundSender> = Arc::new(StdoutSender {
        writer: Mutex::new(BufWriter::new(tokio::io::stdout())),
    });

    // Stdin is read on its own task; the service drains the channel.
    let (tx, mut events) = ChannelEventSource::channel(EVENT_CAPACITY);
    let reader = tokio::spawn(read_events(tx));

    let handled = service.run(&mut events, sender).await;
    tracing::info!(handled, "event loop finished");
    match reader.await {
        Ok(Err(e)) => tracing::warn!("stdin reader stopped: {e}"),
        Err(e) => tracing::warn!("stdin reader task failed: {e}"),
        Ok(Ok(())) => {}
    }
    service.close().await;

    tracing::info!("moodmoji-host shut down cleanly");
    Ok(())
}
