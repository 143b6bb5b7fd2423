//! Weighted keyword classifier for replies and user messages.
//!
//! Two entry points:
//!
//! 1. [`classify_reply`]: weighted scoring over [`REPLY_EMOTION_TABLE`];
//!    near-ties are broken at random and a no-match reply still gets a
//!    label drawn from [`FALLBACK_REPLY_EMOTIONS`].
//! 2. [`classify_user_message`]: unweighted match counting over
//!    [`USER_EMOTION_TABLE`]; a no-match message is [`UserEmotion::Neutral`].

use super::labels::{EmotionLabel, UserEmotion};
use super::tables::{
    FALLBACK_REPLY_EMOTIONS, LENGTH_FACTOR_CAP, LENGTH_FACTOR_DIVISOR, REPLY_EMOTION_TABLE,
    TIE_BAND_RATIO, USER_EMOTION_TABLE,
};
use rand::Rng;
use rand::seq::SliceRandom;

/// Classify a reply using the thread-local RNG for tie-breaking.
pub fn classify_reply(text: &str) -> EmotionLabel {
    classify_reply_with(text, &mut rand::thread_rng())
}

/// Classify a reply with an explicit RNG.
///
/// Always returns a label; absence of signal is never treated as neutral.
pub fn classify_reply_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> EmotionLabel {
    let scores = score_reply(text);

    let Some(top) = scores.first().map(|(_, score)| *score) else {
        let label = FALLBACK_REPLY_EMOTIONS
            .choose(rng)
            .copied()
            // FALLBACK_REPLY_EMOTIONS is a non-empty const slice.
            .unwrap_or(EmotionLabel::FriendlyWarm);
        tracing::debug!(%label, "no reply keywords matched, using fallback");
        return label;
    };

    let threshold = top * TIE_BAND_RATIO;
    let band: Vec<EmotionLabel> = scores
        .iter()
        .filter(|(_, score)| *score >= threshold)
        .map(|(label, _)| *label)
        .collect();

    let label = band.choose(rng).copied().unwrap_or(scores[0].0);
    tracing::debug!(%label, candidates = band.len(), top_score = top, "classified reply");
    label
}

/// Score every reply label that matched at least one keyword, best first.
///
/// `score = matches × weight × min(1.5, chars / 50)`. Equal scores keep
/// table order.
#[must_use]
pub fn score_reply(text: &str) -> Vec<(EmotionLabel, f64)> {
    let lower = text.to_lowercase();
    let length_factor =
        (text.chars().count() as f64 / LENGTH_FACTOR_DIVISOR).min(LENGTH_FACTOR_CAP);

    let mut scores: Vec<(EmotionLabel, f64)> = REPLY_EMOTION_TABLE
        .iter()
        .filter_map(|&(label, weight, keywords)| {
            let matches = count_matches(&lower, keywords);
            (matches > 0).then(|| (label, matches as f64 * weight * length_factor))
        })
        .collect();

    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

/// Classify the user's originating message.
///
/// Highest raw match count wins; ties go to the earlier table row.
pub fn classify_user_message(text: &str) -> UserEmotion {
    let lower = text.to_lowercase();

    let mut best = UserEmotion::Neutral;
    let mut best_score = 0usize;
    for &(emotion, keywords) in USER_EMOTION_TABLE {
        let score = count_matches(&lower, keywords);
        if score > best_score {
            best_score = score;
            best = emotion;
        }
    }
    best
}

fn count_matches(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| lower.contains(*kw)).count()
}
