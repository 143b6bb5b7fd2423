//! Error types for the moodmoji pipeline.
//!
//! Every variant is absorbed at the orchestrator boundary: the only
//! user-visible failure mode is that no image is sent for a turn.

/// Top-level error type for catalog ingestion, selection and download.
#[derive(Debug, thiserror::Error)]
pub enum EmojiError {
    /// Network or transport failure while fetching a catalog or an asset.
    #[error("source unreachable: {0}")]
    SourceUnreachable(String),

    /// A catalog source returned JSON in an unsupported shape.
    #[error("malformed source: {0}")]
    MalformedSource(String),

    /// A selection was made but its file is not on disk at send time.
    #[error("asset missing locally: {0}")]
    AssetMissingLocally(String),

    /// Every candidate tier was exhausted.
    #[error("no candidate found: {0}")]
    NoCandidateFound(String),

    /// HTTP client construction or non-success response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, EmojiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_source_unreachable() {
        let err = EmojiError::SourceUnreachable("connection refused".into());
        assert_eq!(err.to_string(), "source unreachable: connection refused");
    }

    #[test]
    fn display_malformed_source() {
        let err = EmojiError::MalformedSource("expected array or {data}".into());
        assert_eq!(
            err.to_string(),
            "malformed source: expected array or {data}"
        );
    }

    #[test]
    fn display_asset_missing() {
        let err = EmojiError::AssetMissingLocally("/tmp/x.png".into());
        assert_eq!(err.to_string(), "asset missing locally: /tmp/x.png");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EmojiError = io.into();
        assert!(matches!(err, EmojiError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EmojiError>();
    }
}
