//! Closed label sets for reply emotions and user-message affect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emotional tone of a generated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    HappyExcited,
    FriendlyWarm,
    CutePlayful,
    CaringGentle,
    ThinkingWise,
    SurprisedCurious,
    Encouraging,
    FoodRelated,
    SleepTired,
    WorkStudy,
    Gaming,
    Apologetic,
    Confused,
    Grateful,
}

impl EmotionLabel {
    /// Every label, in table order.
    pub const ALL: [EmotionLabel; 14] = [
        Self::HappyExcited,
        Self::FriendlyWarm,
        Self::CutePlayful,
        Self::CaringGentle,
        Self::ThinkingWise,
        Self::SurprisedCurious,
        Self::Encouraging,
        Self::FoodRelated,
        Self::SleepTired,
        Self::WorkStudy,
        Self::Gaming,
        Self::Apologetic,
        Self::Confused,
        Self::Grateful,
    ];

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HappyExcited => "happy_excited",
            Self::FriendlyWarm => "friendly_warm",
            Self::CutePlayful => "cute_playful",
            Self::CaringGentle => "caring_gentle",
            Self::ThinkingWise => "thinking_wise",
            Self::SurprisedCurious => "surprised_curious",
            Self::Encouraging => "encouraging",
            Self::FoodRelated => "food_related",
            Self::SleepTired => "sleep_tired",
            Self::WorkStudy => "work_study",
            Self::Gaming => "gaming",
            Self::Apologetic => "apologetic",
            Self::Confused => "confused",
            Self::Grateful => "grateful",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("unknown emotion label: {s}"))
    }
}

/// Raw affect of the user's originating message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEmotion {
    Happy,
    Excited,
    Sad,
    Angry,
    Tired,
    Bored,
    Surprised,
    Confused,
    Food,
    Work,
    Game,
    Love,
    Weather,
    Complain,
    Praise,
    Neutral,
}

impl UserEmotion {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Tired => "tired",
            Self::Bored => "bored",
            Self::Surprised => "surprised",
            Self::Confused => "confused",
            Self::Food => "food",
            Self::Work => "work",
            Self::Game => "game",
            Self::Love => "love",
            Self::Weather => "weather",
            Self::Complain => "complain",
            Self::Praise => "praise",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for UserEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
