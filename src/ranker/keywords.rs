//! Search keyword tables for candidate ranking.
//!
//! Each reply emotion maps to a primary and a secondary keyword set that
//! are matched against a record's lowercased `name category` text. User
//! affect contributes extra secondary keywords, and a filename inference
//! table lets names like `哭哭.gif` match emotions by theme.

use crate::catalog::EmojiRecord;
use crate::emotion::{EmotionLabel, UserEmotion};

/// Primary and secondary keyword sets for one emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordTiers {
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
}

/// Used for any emotion without a row in [`EMOTION_KEYWORDS`].
pub const DEFAULT_KEYWORDS: KeywordTiers = KeywordTiers {
    primary: &["友好", "开心", "好"],
    secondary: &["棒", "不错"],
};

pub const EMOTION_KEYWORDS: &[(EmotionLabel, KeywordTiers)] = &[
    (
        EmotionLabel::HappyExcited,
        KeywordTiers {
            primary: &[
                "开心", "笑", "高兴", "快乐", "哈哈", "嘻嘻", "兴奋", "激动", "开森", "爽", "太棒",
            ],
            secondary: &["好", "棒", "赞", "厉害", "牛", "爱了", "666"],
        },
    ),
    (
        EmotionLabel::FriendlyWarm,
        KeywordTiers {
            primary: &["友好", "亲切", "微笑", "温暖", "欢迎", "你好", "见面", "打招呼"],
            secondary: &["好", "棒", "开心", "爱", "亲"],
        },
    ),
    (
        EmotionLabel::CutePlayful,
        KeywordTiers {
            primary: &[
                "可爱", "萌", "卖萌", "软萌", "调皮", "淘气", "搞怪", "玩耍", "嬉戏", "呆萌", "小可爱",
            ],
            secondary: &["逗", "乖", "小", "呆", "萌萌哒"],
        },
    ),
    (
        EmotionLabel::CaringGentle,
        KeywordTiers {
            primary: &["关心", "照顾", "温柔", "体贴", "爱护", "安慰", "抱抱", "保重", "小心"],
            secondary: &["好", "乖", "温暖", "爱", "心疼"],
        },
    ),
    (
        EmotionLabel::ThinkingWise,
        KeywordTiers {
            primary: &[
                "思考", "想", "考虑", "琢磨", "智慧", "学习", "明白", "理解", "分析", "研究",
            ],
            secondary: &["疑问", "想想", "嗯", "思索"],
        },
    ),
    (
        EmotionLabel::SurprisedCurious,
        KeywordTiers {
            primary: &[
                "惊讶", "哇", "震惊", "意外", "好奇", "有趣", "探索", "发现", "没想到", "真的",
            ],
            secondary: &["什么", "原来", "咦"],
        },
    ),
    (
        EmotionLabel::Encouraging,
        KeywordTiers {
            primary: &["加油", "努力", "支持", "相信", "坚持", "能行", "鼓励", "加把劲"],
            secondary: &["好", "棒", "厉害", "可以", "行"],
        },
    ),
    (
        EmotionLabel::FoodRelated,
        KeywordTiers {
            primary: &[
                "吃", "美食", "饿", "香", "馋", "好吃", "味道", "料理", "饭", "菜", "食物", "餐厅",
                "烹饪",
            ],
            secondary: &["口水", "流口水", "想吃", "香香", "饕餮"],
        },
    ),
    (
        EmotionLabel::SleepTired,
        KeywordTiers {
            primary: &["睡", "困", "累", "休息", "梦", "床", "被子", "打哈欠", "疲惫", "瞌睡"],
            secondary: &["想睡", "累了", "乏"],
        },
    ),
    (
        EmotionLabel::WorkStudy,
        KeywordTiers {
            primary: &[
                "工作", "学习", "任务", "完成", "专注", "效率", "上班", "考试", "作业", "忙碌",
            ],
            secondary: &["忙", "努力", "加班", "书", "学"],
        },
    ),
    (
        EmotionLabel::Gaming,
        KeywordTiers {
            primary: &[
                "游戏", "玩", "通关", "技能", "战斗", "冒险", "娱乐", "开黑", "上分", "电竞", "操作",
            ],
            secondary: &["打游戏", "玩游戏", "胜利", "输了", "菜"],
        },
    ),
    (
        EmotionLabel::Apologetic,
        KeywordTiers {
            primary: &["对不起", "抱歉", "不好意思", "sorry", "道歉", "错了"],
            secondary: &["错", "不对", "麻烦", "失误"],
        },
    ),
    (
        EmotionLabel::Confused,
        KeywordTiers {
            primary: &["疑惑", "困惑", "不明白", "想想", "不知道", "搞不懂", "迷茫"],
            secondary: &["什么", "为什么", "怎么", "咋办"],
        },
    ),
    (
        EmotionLabel::Grateful,
        KeywordTiers {
            primary: &["感谢", "谢谢", "感激", "感恩", "thanks", "多谢"],
            secondary: &["好", "棒", "爱了", "感动"],
        },
    ),
];

/// Extra secondary keywords derived from the user's affect.
pub const USER_EMOTION_KEYWORDS: &[(UserEmotion, &[&str])] = &[
    (UserEmotion::Happy, &["开心", "笑", "高兴", "快乐", "兴奋", "可爱"]),
    (UserEmotion::Excited, &["兴奋", "激动", "太棒了", "骄傲", "厉害"]),
    (UserEmotion::Sad, &["安慰", "抱抱", "陪伴", "担心", "温柔"]),
    (UserEmotion::Angry, &["理解", "支持", "冷静", "放松", "保护"]),
    (UserEmotion::Tired, &["困", "睡", "休息", "摸鱼", "躺平"]),
    (UserEmotion::Bored, &["玩耍", "有趣", "好奇", "调皮", "坏笑"]),
    (UserEmotion::Surprised, &["惊", "震惊", "哇", "好奇"]),
    (UserEmotion::Confused, &["思考", "想想", "琢磨", "帮助"]),
    (UserEmotion::Food, &["饿", "吃", "美食", "馋", "期待"]),
    (UserEmotion::Work, &["加油", "努力", "辛苦", "摸鱼"]),
    (UserEmotion::Game, &["游戏", "开黑", "上分", "挑战"]),
    (UserEmotion::Love, &["害羞", "脸红", "甜蜜", "幸福"]),
    (UserEmotion::Weather, &["温暖", "晒太阳", "下雨"]),
    (UserEmotion::Complain, &["理解", "抱抱", "同感"]),
    (UserEmotion::Praise, &["害羞", "骄傲", "感谢", "自豪"]),
    (UserEmotion::Neutral, &["好奇", "友好", "思考", "可爱"]),
];

/// Filename theme → keywords that reveal it.
pub const FILENAME_EMOTIONS: &[(&str, &[&str])] = &[
    ("开心", &["开心", "笑", "高兴", "快乐", "哈哈", "嘻嘻", "爽", "开森"]),
    ("可爱", &["可爱", "萌", "卖萌", "软萌", "呆萌", "小可爱", "kawaii"]),
    ("吃", &["吃", "美食", "饿", "香", "馋", "好吃", "味道", "食物", "饭", "菜"]),
    ("睡", &["睡", "困", "累", "休息", "梦", "床", "瞌睡"]),
    ("哭", &["哭", "泪", "伤心", "难过", "呜呜", "泪目"]),
    ("生气", &["生气", "愤怒", "气", "怒", "mad", "angry"]),
    ("惊讶", &["惊", "震惊", "哇", "意外", "surprised"]),
    ("疑问", &["疑问", "问号", "什么", "why", "confused"]),
    ("无语", &["无语", "无奈", "醉了", "服了", "speechless"]),
    ("害羞", &["害羞", "脸红", "不好意思", "shy"]),
    ("加油", &["加油", "努力", "fighting", "支持"]),
    ("谢谢", &["谢谢", "感谢", "thanks", "感激"]),
    ("对不起", &["对不起", "抱歉", "sorry", "道歉"]),
    ("游戏", &["游戏", "玩", "game", "play"]),
    ("工作", &["工作", "学习", "work", "study"]),
    ("思考", &["思考", "想", "thinking", "考虑"]),
];

/// Keyword tiers for `emotion`, or [`DEFAULT_KEYWORDS`].
#[must_use]
pub fn keywords_for(emotion: EmotionLabel) -> KeywordTiers {
    EMOTION_KEYWORDS
        .iter()
        .find(|(label, _)| *label == emotion)
        .map_or(DEFAULT_KEYWORDS, |(_, tiers)| *tiers)
}

/// Themes a file name hints at, each reported once, in table order.
#[must_use]
pub fn infer_filename_emotions(file_name: &str) -> Vec<&'static str> {
    if file_name.is_empty() {
        return Vec::new();
    }
    let lower = file_name.to_lowercase();
    FILENAME_EMOTIONS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(theme, _)| *theme)
        .collect()
}

/// How well a record matches a [`SearchKeywords`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrength {
    /// A primary keyword or an inferred filename theme matched.
    Primary,
    /// Only a secondary keyword matched.
    Secondary,
    None,
}

/// Resolved keyword sets for one selection.
#[derive(Debug, Clone, Default)]
pub struct SearchKeywords {
    primary: Vec<&'static str>,
    secondary: Vec<&'static str>,
}

impl SearchKeywords {
    #[must_use]
    pub fn for_emotion(emotion: EmotionLabel) -> Self {
        let tiers = keywords_for(emotion);
        Self {
            primary: tiers.primary.to_vec(),
            secondary: tiers.secondary.to_vec(),
        }
    }

    /// Add the user-affect keywords as secondary matches.
    #[must_use]
    pub fn with_user_emotion(mut self, user_emotion: UserEmotion) -> Self {
        if let Some((_, extra)) = USER_EMOTION_KEYWORDS
            .iter()
            .find(|(emotion, _)| *emotion == user_emotion)
        {
            for kw in *extra {
                if !self.primary.contains(kw) && !self.secondary.contains(kw) {
                    self.secondary.push(kw);
                }
            }
        }
        self
    }

    pub fn primary(&self) -> &[&'static str] {
        &self.primary
    }

    pub fn secondary(&self) -> &[&'static str] {
        &self.secondary
    }

    /// Classify a record against these keywords.
    #[must_use]
    pub fn match_record(&self, record: &EmojiRecord) -> MatchStrength {
        let text = record.search_text();
        let inferred = infer_filename_emotions(&record.name)
            .into_iter()
            .any(|theme| self.primary.contains(&theme) || self.secondary.contains(&theme));

        if inferred || self.primary.iter().any(|kw| text.contains(kw)) {
            MatchStrength::Primary
        } else if self.secondary.iter().any(|kw| text.contains(kw)) {
            MatchStrength::Secondary
        } else {
            MatchStrength::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(name: &str, category: &str) -> EmojiRecord {
        EmojiRecord::new(Path::new("/e"), name, category, "")
    }

    #[test]
    fn every_label_has_keywords() {
        for label in EmotionLabel::ALL {
            assert!(
                EMOTION_KEYWORDS.iter().any(|(l, _)| *l == label),
                "missing keywords for {label}"
            );
        }
    }

    #[test]
    fn every_user_emotion_has_keywords() {
        for (_, keywords) in USER_EMOTION_KEYWORDS {
            assert!(!keywords.is_empty());
        }
        assert_eq!(USER_EMOTION_KEYWORDS.len(), 16);
    }

    #[test]
    fn filename_inference_reports_each_theme_once() {
        assert_eq!(infer_filename_emotions("哭哭泪目.gif"), vec!["哭"]);
        assert_eq!(infer_filename_emotions("Kawaii_Game.png"), vec!["可爱", "游戏"]);
        assert!(infer_filename_emotions("").is_empty());
        assert!(infer_filename_emotions("x.png").is_empty());
    }

    #[test]
    fn primary_beats_secondary() {
        let keywords = SearchKeywords::for_emotion(EmotionLabel::HappyExcited);
        assert_eq!(
            keywords.match_record(&record("大笑.png", "misc")),
            MatchStrength::Primary
        );
        assert_eq!(
            keywords.match_record(&record("点赞.png", "misc")),
            MatchStrength::Secondary
        );
        assert_eq!(
            keywords.match_record(&record("x.png", "misc")),
            MatchStrength::None
        );
    }

    #[test]
    fn category_text_is_matched() {
        let keywords = SearchKeywords::for_emotion(EmotionLabel::FoodRelated);
        assert_eq!(
            keywords.match_record(&record("001.jpg", "美食表情")),
            MatchStrength::Primary
        );
    }

    #[test]
    fn inferred_theme_counts_as_primary() {
        // "kawaii" is not a cute keyword itself but infers the "可爱" theme.
        let keywords = SearchKeywords::for_emotion(EmotionLabel::CutePlayful);
        assert_eq!(
            keywords.match_record(&record("kawaii.gif", "misc")),
            MatchStrength::Primary
        );
    }

    #[test]
    fn user_emotion_adds_secondary_keywords() {
        let keywords =
            SearchKeywords::for_emotion(EmotionLabel::Gaming).with_user_emotion(UserEmotion::Sad);
        assert!(keywords.secondary().contains(&"抱抱"));
        assert_eq!(
            keywords.match_record(&record("抱抱.png", "misc")),
            MatchStrength::Secondary
        );
    }

    #[test]
    fn user_keywords_do_not_duplicate() {
        let keywords = SearchKeywords::for_emotion(EmotionLabel::HappyExcited)
            .with_user_emotion(UserEmotion::Happy);
        let count = keywords
            .primary()
            .iter()
            .chain(keywords.secondary())
            .filter(|kw| **kw == "开心")
            .count();
        assert_eq!(count, 1);
    }
}
