//! Emotion classification for replies and user messages.

pub mod classifier;
pub mod labels;
pub mod tables;

pub use classifier::{classify_reply, classify_reply_with, classify_user_message, score_reply};
pub use labels::{EmotionLabel, UserEmotion};
