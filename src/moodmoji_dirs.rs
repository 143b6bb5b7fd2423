//! Centralized directory paths for moodmoji.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/moodmoji/` | `~/.local/share/moodmoji/` |
//! | Config | `~/Library/Application Support/moodmoji/` | `~/.config/moodmoji/` |
//!
//! # Environment Overrides
//!
//! - `MOODMOJI_DATA_DIR` overrides [`data_dir`]
//! - `MOODMOJI_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// File name of the catalog snapshot inside the asset directory.
pub const SNAPSHOT_FILE_NAME: &str = "emoji_cache.json";

/// Application data root directory.
///
/// Resolves to `dirs::data_dir()/moodmoji/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("MOODMOJI_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("moodmoji"))
        .unwrap_or_else(|| PathBuf::from("/tmp/moodmoji-data"))
}

/// Application config directory, home of `config.toml`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("MOODMOJI_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("moodmoji"))
        .unwrap_or_else(|| PathBuf::from("/tmp/moodmoji-config"))
}

/// Default asset directory (`data_dir()/emojis/`).
///
/// Downloaded images land in `<emoji_dir>/<category>/<name>` and the
/// catalog snapshot sits at the root of this directory.
#[must_use]
pub fn emoji_dir() -> PathBuf {
    data_dir().join("emojis")
}
