//! Configuration types for emoji selection.
//!
//! The core never validates its own inputs; [`EmojiConfig::validate`] is
//! called once at the boundary when the service opens.

use crate::error::{EmojiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog used when no source is configured.
pub const DEFAULT_EMOJI_SOURCE: &str =
    "https://raw.githubusercontent.com/zhaoolee/ChineseBQB/master/chinesebqb_github.json";

/// Base for catalog entries whose `url` is relative.
pub const DEFAULT_ASSET_BASE_URL: &str = "https://raw.githubusercontent.com/zhaoolee/ChineseBQB/master/";

/// User-Agent sent with catalog and asset requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) moodmoji/0.1";

/// Chance of skipping local search to prefer fresh remote content.
pub const DIVERSITY_PROBABILITY: f64 = 0.4;

/// Local search is abandoned when fewer candidates than this match.
pub const MIN_LOCAL_CANDIDATES: usize = 8;

/// Down-sample cap for the unclassified remote tier.
pub const REMOTE_SAMPLE_CAP: usize = 50;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Master switch: when false, replies are never classified.
    pub enable_context_parsing: bool,
    /// Probability that a classified reply is followed by an image.
    pub send_probability: f64,
    /// Timeout for catalog fetches and asset downloads, in seconds.
    pub request_timeout_secs: u64,
    /// Catalog source descriptor: URL, JSON file, directory, or empty.
    pub emoji_source: String,
    /// Base URL used to resolve relative asset URLs.
    pub asset_base_url: String,
    /// Asset + snapshot directory. `None` uses [`crate::moodmoji_dirs::emoji_dir`].
    pub emoji_dir: Option<PathBuf>,
    /// User-Agent header for outgoing requests.
    pub user_agent: String,
    /// Mood tracking settings.
    pub mood: MoodConfig,
    /// Candidate selection settings.
    pub selection: SelectionConfig,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            enable_context_parsing: true,
            send_probability: 0.3,
            request_timeout_secs: 15,
            emoji_source: DEFAULT_EMOJI_SOURCE.to_owned(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_owned(),
            emoji_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            mood: MoodConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

/// Mood continuity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Probability in `[0, 1]` that a new emotion is blended into the
    /// current mood instead of replacing it outright.
    pub continuity_factor: f64,
    /// Number of recent turns retained in the context window.
    pub context_window: usize,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            continuity_factor: 0.7,
            context_window: 5,
        }
    }
}

/// Candidate ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Number of recent picks excluded from selection.
    pub history_capacity: usize,
    /// Chance of skipping local search entirely.
    pub diversity_probability: f64,
    /// Minimum local matches before local search is trusted.
    pub min_local_candidates: usize,
    /// Maximum size of the unclassified remote sample.
    pub remote_sample_cap: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            diversity_probability: DIVERSITY_PROBABILITY,
            min_local_candidates: MIN_LOCAL_CANDIDATES,
            remote_sample_cap: REMOTE_SAMPLE_CAP,
        }
    }
}

impl EmojiConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| EmojiError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| EmojiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config_dir>/config.toml`.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::moodmoji_dirs::config_dir().join("config.toml")
    }

    /// Asset directory after applying the default.
    #[must_use]
    pub fn resolved_emoji_dir(&self) -> PathBuf {
        self.emoji_dir
            .clone()
            .unwrap_or_else(crate::moodmoji_dirs::emoji_dir)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - probabilities and the continuity factor lie in `[0, 1]`
    /// - `request_timeout_secs` is greater than 0
    /// - `mood.context_window` and `selection.history_capacity` are greater than 0
    /// - `selection.remote_sample_cap` is greater than 0
    pub fn validate(&self) -> Result<()> {
        check_unit("send_probability", self.send_probability)?;
        check_unit("mood.continuity_factor", self.mood.continuity_factor)?;
        check_unit(
            "selection.diversity_probability",
            self.selection.diversity_probability,
        )?;
        if self.request_timeout_secs == 0 {
            return Err(EmojiError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.mood.context_window == 0 {
            return Err(EmojiError::Config(
                "mood.context_window must be greater than 0".into(),
            ));
        }
        if self.selection.history_capacity == 0 {
            return Err(EmojiError::Config(
                "selection.history_capacity must be greater than 0".into(),
            ));
        }
        if self.selection.remote_sample_cap == 0 {
            return Err(EmojiError::Config(
                "selection.remote_sample_cap must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EmojiError::Config(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}
