//! On-demand asset downloads.
//!
//! [`Downloader::fetch`] never fails loudly: every problem is logged and
//! reported as `false`, and the caller simply moves on to another
//! candidate next time.

use crate::catalog::EmojiRecord;
use crate::config::EmojiConfig;
use crate::error::{EmojiError, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Write buffer size for streamed bodies.
pub const CHUNK_SIZE: usize = 8192;

/// Fetches single assets into their derived local paths.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    /// Build a downloader from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmojiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EmojiConfig) -> Result<Self> {
        Ok(Self::with_client(crate::http::build_client(config)?))
    }

    /// Use an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Ensure `record`'s asset exists locally.
    ///
    /// Returns `true` if the file already existed or was downloaded.
    pub async fn fetch(&self, record: &EmojiRecord) -> bool {
        if !record.is_usable() {
            tracing::debug!(name = %record.name, "record has no local path, skipping download");
            return false;
        }
        if record.is_local().await {
            return true;
        }
        if record.url.is_empty() {
            tracing::debug!(name = %record.name, "record has no source url, skipping download");
            return false;
        }

        match self.download(&record.url, &record.local_path).await {
            Ok(bytes) => {
                tracing::info!(
                    name = %record.name,
                    category = %record.category,
                    bytes,
                    "downloaded emoji"
                );
                true
            }
            Err(e) => {
                tracing::warn!(name = %record.name, url = %record.url, error = %e, "emoji download failed");
                false
            }
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EmojiError::SourceUnreachable(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmojiError::SourceUnreachable(format!(
                "{url}: HTTP {status}"
            )));
        }

        let tmp = part_path(dest);
        let written = match stream_to_file(response, &tmp).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&tmp, dest).await?;
        Ok(written)
    }
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<u64> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| EmojiError::SourceUnreachable(format!("read error: {e}")))?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// `<dest>.part`, keeping the original extension visible.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloader() -> Downloader {
        Downloader::new(&EmojiConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn downloads_into_category_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 20_000]))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(
            dir.path(),
            "a.png",
            "cats/happy",
            &format!("{}/img/a.png", server.uri()),
        );

        assert!(downloader().fetch(&record).await);
        let bytes = std::fs::read(dir.path().join("cats/happy/a.png")).unwrap();
        assert_eq!(bytes.len(), 20_000);
        assert!(!part_path(&record.local_path).exists());
    }

    #[tokio::test]
    async fn not_found_returns_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(
            dir.path(),
            "gone.png",
            "misc",
            &format!("{}/gone.png", server.uri()),
        );

        assert!(!downloader().fetch(&record).await);
        assert!(!record.local_path.exists());
        assert!(!part_path(&record.local_path).exists());
    }

    #[tokio::test]
    async fn existing_file_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(
            dir.path(),
            "here.png",
            "misc",
            &format!("{}/here.png", server.uri()),
        );
        std::fs::create_dir_all(record.local_path.parent().unwrap()).unwrap();
        std::fs::write(&record.local_path, b"png").unwrap();

        assert!(downloader().fetch(&record).await);
        assert_eq!(std::fs::read(&record.local_path).unwrap(), b"png");
    }

    #[tokio::test]
    async fn unreachable_host_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(dir.path(), "x.png", "misc", "http://127.0.0.1:9/x.png");
        assert!(!downloader().fetch(&record).await);
    }

    #[tokio::test]
    async fn unusable_record_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let record = EmojiRecord::new(dir.path(), "", "misc", "http://example.invalid/x.png");
        assert!(!downloader().fetch(&record).await);
    }

    #[test]
    fn part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/e/misc/a.png")),
            PathBuf::from("/e/misc/a.png.part")
        );
    }
}
