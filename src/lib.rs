//! Moodmoji: mood-aware reaction images for generated chat replies.
//!
//! Given the text of a reply, the pipeline picks an image ("emoji") whose
//! theme matches the reply's emotional tone and hands its local path to
//! the host for delivery:
//!
//! Reply text → classifier → mood tracker → send gate → ranker → downloader → sender
//!
//! # Architecture
//!
//! - **Catalog**: records ingested from a remote JSON catalog, a local JSON
//!   file or a directory scan, snapshotted to disk
//! - **Emotion**: weighted keyword classification of replies and user messages
//! - **Mood**: rolling context window with continuity blending
//! - **Ranker**: tiered local/remote search with an anime-affinity heuristic
//!   and a usage history to avoid repeats
//! - **Download**: on-demand asset fetch into the local asset directory
//! - **Orchestrator**: [`EmojiService`], the owned service tying it together

pub mod catalog;
pub mod config;
pub mod download;
pub mod emotion;
pub mod error;
pub mod history;
pub mod http;
pub mod mood;
pub mod moodmoji_dirs;
pub mod orchestrator;
pub mod ranker;
pub mod stats;

pub use catalog::{Catalog, CatalogStore, EmojiRecord};
pub use config::EmojiConfig;
pub use download::Downloader;
pub use emotion::{EmotionLabel, UserEmotion};
pub use error::{EmojiError, Result};
pub use history::UsageHistory;
pub use mood::MoodTracker;
pub use orchestrator::{
    ChannelEventSource, EmojiService, InboundEventSource, OutboundSender, ReplyEvent, ReplyPart,
};
pub use ranker::CandidateRanker;
pub use stats::CatalogStats;
