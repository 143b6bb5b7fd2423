//! Shared HTTP client for catalog fetches and asset downloads.

use crate::config::EmojiConfig;
use crate::error::{EmojiError, Result};
use std::time::Duration;

/// Build a [`reqwest::Client`] for catalog and asset requests.
///
/// The client has:
/// - Total request timeout from `request_timeout_secs`
/// - The configured User-Agent
/// - TLS certificate verification disabled
/// - At most 10 redirects
///
/// # Errors
///
/// Returns [`EmojiError::Http`] if the client cannot be constructed.
pub fn build_client(config: &EmojiConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| EmojiError::Http(format!("failed to build HTTP client: {e}")))
}
