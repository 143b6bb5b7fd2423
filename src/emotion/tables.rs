//! Keyword tables driving the emotion classifiers.
//!
//! These are data, not logic: the classifier only iterates them, so they
//! can be audited and replaced without touching scoring code.

use super::labels::{EmotionLabel, UserEmotion};

/// (label, weight, keywords) for reply classification.
pub const REPLY_EMOTION_TABLE: &[(EmotionLabel, f64, &[&str])] = &[
    (
        EmotionLabel::HappyExcited,
        2.0,
        &[
            "哈哈", "开心", "高兴", "快乐", "太好了", "棒", "赞", "笑", "嘻嘻", "太棒了", "amazing",
            "wow", "激动", "兴奋", "厉害", "牛逼", "绝了",
        ],
    ),
    (
        EmotionLabel::FriendlyWarm,
        1.5,
        &[
            "你好", "欢迎", "很高兴", "谢谢", "不客气", "希望", "祝", "关心", "温暖", "陪伴",
        ],
    ),
    (
        EmotionLabel::CutePlayful,
        2.0,
        &[
            "可爱", "萌", "么么", "mua", "小可爱", "乖", "软萌", "调皮", "淘气", "嘿嘿", "逗",
            "搞怪", "～", "~", "啦", "呀", "哟",
        ],
    ),
    (
        EmotionLabel::CaringGentle,
        1.8,
        &[
            "要注意", "小心", "多休息", "保重", "记得", "别忘了", "照顾", "温柔", "慢慢",
            "不要着急", "别担心", "没关系",
        ],
    ),
    (
        EmotionLabel::ThinkingWise,
        1.2,
        &[
            "我觉得", "分析", "考虑", "思考", "建议", "或许", "可能", "应该", "经验", "学习",
            "明白", "理解",
        ],
    ),
    (
        EmotionLabel::SurprisedCurious,
        1.6,
        &[
            "哇", "真的吗", "没想到", "惊讶", "意外", "竟然", "原来", "好奇", "想知道", "有趣",
            "为什么", "怎么", "探索",
        ],
    ),
    (
        EmotionLabel::Encouraging,
        1.5,
        &[
            "相信", "能行", "加油", "努力", "坚持", "不放弃", "一定可以", "支持",
        ],
    ),
    (
        EmotionLabel::FoodRelated,
        2.5,
        &[
            "吃", "美食", "饿", "香", "好吃", "味道", "料理", "烹饪", "餐厅", "菜", "饭",
        ],
    ),
    (
        EmotionLabel::SleepTired,
        2.5,
        &["睡", "困", "休息", "累", "梦", "床", "被子", "打哈欠"],
    ),
    (
        EmotionLabel::WorkStudy,
        2.0,
        &[
            "工作", "学习", "任务", "完成", "专注", "效率", "上班", "考试", "作业",
        ],
    ),
    (
        EmotionLabel::Gaming,
        2.5,
        &[
            "游戏", "玩", "通关", "技能", "战斗", "冒险", "娱乐", "开黑", "上分",
        ],
    ),
    (
        EmotionLabel::Apologetic,
        1.8,
        &[
            "对不起", "抱歉", "不好意思", "sorry", "打扰", "麻烦", "我还在学习", "可能不够", "尽力",
        ],
    ),
    (
        EmotionLabel::Confused,
        1.5,
        &[
            "不太明白", "疑惑", "困惑", "不确定", "可能需要", "不知道", "搞不懂",
        ],
    ),
    (
        EmotionLabel::Grateful,
        1.5,
        &["感谢", "谢谢", "感激", "感恩", "appreciate", "thanks"],
    ),
];

/// Labels drawn from when a reply matches no keyword at all.
pub const FALLBACK_REPLY_EMOTIONS: &[EmotionLabel] = &[
    EmotionLabel::FriendlyWarm,
    EmotionLabel::CutePlayful,
    EmotionLabel::HappyExcited,
    EmotionLabel::ThinkingWise,
];

/// Labels scoring at least this fraction of the top score compete for the pick.
pub const TIE_BAND_RATIO: f64 = 0.8;

/// Length scaling: `min(LENGTH_FACTOR_CAP, chars / LENGTH_FACTOR_DIVISOR)`.
pub const LENGTH_FACTOR_CAP: f64 = 1.5;

/// See [`LENGTH_FACTOR_CAP`].
pub const LENGTH_FACTOR_DIVISOR: f64 = 50.0;

/// (label, keywords) for user-message classification. Order breaks ties.
pub const USER_EMOTION_TABLE: &[(UserEmotion, &[&str])] = &[
    (
        UserEmotion::Happy,
        &[
            "开心", "高兴", "快乐", "哈哈", "笑", "太好了", "棒", "赞", "爱了", "开森", "嘻嘻",
        ],
    ),
    (
        UserEmotion::Excited,
        &[
            "激动", "兴奋", "太棒了", "amazing", "wow", "牛逼", "666", "绝了", "炸了",
        ],
    ),
    (
        UserEmotion::Sad,
        &[
            "难过", "伤心", "哭", "呜呜", "泪目", "心碎", "郁闷", "沮丧", "失落",
        ],
    ),
    (
        UserEmotion::Angry,
        &[
            "生气", "愤怒", "气死了", "烦", "讨厌", "无语", "醉了", "服了", "恶心",
        ],
    ),
    (
        UserEmotion::Tired,
        &["累", "困", "疲惫", "睡觉", "休息", "躺平", "乏了"],
    ),
    (
        UserEmotion::Bored,
        &["无聊", "闲", "发呆", "没事干", "emmm"],
    ),
    (
        UserEmotion::Surprised,
        &["哇", "震惊", "吃惊", "意外", "没想到", "居然", "竟然"],
    ),
    (
        UserEmotion::Confused,
        &["疑问", "不懂", "迷惑", "???", "啥", "什么意思", "不明白"],
    ),
    (
        UserEmotion::Food,
        &["饿", "吃", "美食", "好吃", "香", "馋", "想吃"],
    ),
    (
        UserEmotion::Work,
        &["工作", "上班", "学习", "忙", "加班", "考试", "作业"],
    ),
    (
        UserEmotion::Game,
        &["游戏", "玩", "开黑", "上分", "菜", "坑", "大佬"],
    ),
    (
        UserEmotion::Love,
        &["喜欢", "爱", "心动", "表白", "恋爱", "暗恋", "单身"],
    ),
    (
        UserEmotion::Weather,
        &["天气", "热", "冷", "下雨", "晴天", "阴天"],
    ),
    (
        UserEmotion::Complain,
        &["抱怨", "吐槽", "委屈", "不公平", "为什么"],
    ),
    (
        UserEmotion::Praise,
        &["厉害", "强", "佩服", "崇拜", "大神", "学习了"],
    ),
];
