//! Mood continuity tracking.
//!
//! Keeps a short window of recent turns and a "current mood" that drifts
//! toward each newly classified reply emotion. With probability equal to
//! the continuity factor the new emotion is blended through the
//! compatibility tables; otherwise the mood jumps straight to it.

use crate::config::MoodConfig;
use crate::emotion::{EmotionLabel, UserEmotion};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum characters of reply text kept per context entry.
pub const REPLY_SAMPLE_CHARS: usize = 50;

/// Mood before any reply has been seen.
pub const INITIAL_MOOD: EmotionLabel = EmotionLabel::FriendlyWarm;

/// Moods a given mood can move to without friction.
const COMPATIBLE_MOODS: &[(EmotionLabel, &[EmotionLabel])] = &[
    (
        EmotionLabel::HappyExcited,
        &[EmotionLabel::CutePlayful, EmotionLabel::FriendlyWarm, EmotionLabel::Encouraging, EmotionLabel::Gaming],
    ),
    (
        EmotionLabel::FriendlyWarm,
        &[EmotionLabel::HappyExcited, EmotionLabel::CaringGentle, EmotionLabel::Grateful, EmotionLabel::CutePlayful],
    ),
    (
        EmotionLabel::CutePlayful,
        &[EmotionLabel::HappyExcited, EmotionLabel::FriendlyWarm, EmotionLabel::FoodRelated, EmotionLabel::Gaming],
    ),
    (
        EmotionLabel::CaringGentle,
        &[EmotionLabel::FriendlyWarm, EmotionLabel::SleepTired, EmotionLabel::Encouraging, EmotionLabel::Apologetic],
    ),
    (
        EmotionLabel::ThinkingWise,
        &[EmotionLabel::WorkStudy, EmotionLabel::Confused, EmotionLabel::SurprisedCurious],
    ),
    (
        EmotionLabel::SurprisedCurious,
        &[EmotionLabel::HappyExcited, EmotionLabel::ThinkingWise, EmotionLabel::Confused],
    ),
    (
        EmotionLabel::Encouraging,
        &[EmotionLabel::WorkStudy, EmotionLabel::HappyExcited, EmotionLabel::CaringGentle],
    ),
    (
        EmotionLabel::FoodRelated,
        &[EmotionLabel::HappyExcited, EmotionLabel::CutePlayful, EmotionLabel::SleepTired],
    ),
    (
        EmotionLabel::SleepTired,
        &[EmotionLabel::CaringGentle, EmotionLabel::FoodRelated],
    ),
    (
        EmotionLabel::WorkStudy,
        &[EmotionLabel::ThinkingWise, EmotionLabel::Encouraging, EmotionLabel::SleepTired],
    ),
    (
        EmotionLabel::Gaming,
        &[EmotionLabel::HappyExcited, EmotionLabel::CutePlayful, EmotionLabel::Encouraging],
    ),
    (
        EmotionLabel::Apologetic,
        &[EmotionLabel::CaringGentle, EmotionLabel::Grateful, EmotionLabel::Confused],
    ),
    (
        EmotionLabel::Confused,
        &[EmotionLabel::ThinkingWise, EmotionLabel::SurprisedCurious, EmotionLabel::Apologetic],
    ),
    (
        EmotionLabel::Grateful,
        &[EmotionLabel::FriendlyWarm, EmotionLabel::HappyExcited, EmotionLabel::CaringGentle],
    ),
];

/// Softer stand-ins for an incompatible incoming emotion.
const SMOOTHING_TRANSITIONS: &[(EmotionLabel, EmotionLabel)] = &[
    (EmotionLabel::HappyExcited, EmotionLabel::FriendlyWarm),
    (EmotionLabel::Apologetic, EmotionLabel::CaringGentle),
    (EmotionLabel::Confused, EmotionLabel::ThinkingWise),
    (EmotionLabel::SleepTired, EmotionLabel::CaringGentle),
    (EmotionLabel::Gaming, EmotionLabel::CutePlayful),
    (EmotionLabel::SurprisedCurious, EmotionLabel::ThinkingWise),
];

/// One classified turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
    /// Affect of the user's message.
    pub user_emotion: UserEmotion,
    /// Emotion classified from the reply.
    pub ai_emotion: EmotionLabel,
    /// Reply length in characters.
    pub reply_length: usize,
    /// First [`REPLY_SAMPLE_CHARS`] characters of the reply.
    pub reply_sample: String,
}

/// Blend `next` into `current` using the compatibility tables.
///
/// Compatible → `next`; otherwise the smoothing stand-in for `next` if one
/// exists; otherwise `current` is kept.
#[must_use]
pub fn blend(current: EmotionLabel, next: EmotionLabel) -> EmotionLabel {
    if current == next || compatible_with(current).contains(&next) {
        return next;
    }
    SMOOTHING_TRANSITIONS
        .iter()
        .find(|(from, _)| *from == next)
        .map_or(current, |(_, to)| *to)
}

fn compatible_with(mood: EmotionLabel) -> &'static [EmotionLabel] {
    COMPATIBLE_MOODS
        .iter()
        .find(|(m, _)| *m == mood)
        .map_or(&[], |(_, list)| list)
}

/// Rolling mood state.
#[derive(Debug)]
pub struct MoodTracker {
    current_mood: EmotionLabel,
    context: VecDeque<ContextEntry>,
    window: usize,
    continuity_factor: f64,
    rng: StdRng,
}

impl MoodTracker {
    /// Create a tracker seeded from OS entropy.
    #[must_use]
    pub fn new(config: &MoodConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a tracker with a deterministic RNG.
    #[must_use]
    pub fn with_seed(config: &MoodConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &MoodConfig, rng: StdRng) -> Self {
        let window = config.context_window.max(1);
        Self {
            current_mood: INITIAL_MOOD,
            context: VecDeque::with_capacity(window),
            window,
            continuity_factor: config.continuity_factor.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Record a turn and move the current mood.
    pub fn update(&mut self, user_emotion: UserEmotion, ai_emotion: EmotionLabel, reply_text: &str) {
        if self.context.len() >= self.window {
            self.context.pop_front();
        }
        self.context.push_back(ContextEntry {
            timestamp: Utc::now(),
            user_emotion,
            ai_emotion,
            reply_length: reply_text.chars().count(),
            reply_sample: reply_text.chars().take(REPLY_SAMPLE_CHARS).collect(),
        });

        let previous = self.current_mood;
        self.current_mood = if self.rng.gen_bool(self.continuity_factor) {
            blend(previous, ai_emotion)
        } else {
            ai_emotion
        };
        tracing::debug!(
            %previous,
            %ai_emotion,
            current = %self.current_mood,
            %user_emotion,
            "mood updated"
        );
    }

    /// The current blended mood.
    #[must_use]
    pub fn current_mood(&self) -> EmotionLabel {
        self.current_mood
    }

    /// Recent turns, oldest first.
    pub fn context(&self) -> impl Iterator<Item = &ContextEntry> {
        self.context.iter()
    }

    /// Number of turns currently in the window.
    #[must_use]
    pub fn context_len(&self) -> usize {
        self.context.len()
    }
}
