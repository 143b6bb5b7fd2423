//! Anime-affinity heuristic.
//!
//! Deliberately permissive: a general-purpose catalog is mostly untagged,
//! and a missed anime image costs more than a false positive. A record is
//! anime-tagged when any rule below fires on its lowercased name and
//! category.

use crate::catalog::EmojiRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Franchise, character and generic anime terms (lowercase).
pub const ANIME_TERMS: &[&str] = &[
    // generic
    "可爱的女孩纸", "可爱的男孩纸", "萌妹", "二次元", "动漫", "少女", "少年", "cutegirl",
    "cuteboy", "anime", "kawaii", "moe", "waifu",
    // classics
    "乌沙奇", "兔兔", "哆啦a梦", "多啦a梦", "机器猫", "小叮当", "doraemon", "柯南",
    "名侦探柯南", "conan", "毛利兰", "灰原哀", "皮卡丘", "宠物小精灵", "神奇宝贝", "pokemon",
    "精灵宝可梦", "火影忍者", "鸣人", "佐助", "小樱", "naruto", "海贼王", "路飞", "索隆", "娜美",
    "one piece", "龙珠", "悟空", "贝吉塔", "dragon ball", "美少女战士", "sailor moon", "月野兔",
    "铁臂阿童木", "astro boy", "蜡笔小新", "小新", "crayon shin", "樱桃小丸子", "小丸子",
    "chibi maruko", "hello kitty", "凯蒂猫", "kitty", "熊本熊", "kumamon", "部长", "史努比",
    "snoopy", "加菲猫", "garfield", "米老鼠", "米奇", "mickey", "迪士尼", "disney", "小黄人",
    "minions", "龙猫", "totoro", "宫崎骏", "千与千寻", "spirited away", "进击的巨人",
    "attack on titan", "艾伦", "鬼灭之刃", "炭治郎", "祢豆子", "demon slayer", "你的名字",
    "your name", "新海诚", "死神", "bleach", "一护", "犬夜叉", "inuyasha", "桔梗", "猫和老鼠",
    "tom and jerry", "哆啦美", "dorami",
    // recent
    "呪术廻戦", "jujutsu kaisen", "虎杖", "五条悟", "间谍过家家", "spy family", "阿尼亚", "anya",
    "东京喰种", "tokyo ghoul", "金木研", "约定的梦幻岛", "promised neverland", "艾玛", "re:0",
    "从零开始", "雷姆", "拉姆", "overwatch", "守望先锋", "dva", "小美", "原神", "genshin", "派蒙",
    "甘雨", "胡桃", "明日方舟", "arknights", "凯尔希", "陈", "碧蓝航线", "azur lane", "fgo", "fate",
    "saber", "玛修", "lovelive", "miku", "初音未来", "洛天依", "东方project", "touhou",
    "博丽灵梦", "雾雨魔理沙",
];

/// Generic cuteness and animal words.
const CUTE_WORDS: &[&str] = &[
    "cute", "cat", "dog", "bunny", "bear", "猫", "狗", "兔", "熊", "萌", "可爱", "小",
];

/// Tiny list used when the category carries no information.
const SHORT_CATEGORY_CUTE_WORDS: &[&str] = &["cute", "cat", "萌", "可爱", "猫", "kawaii"];

/// Categories this short or shorter are treated as uninformative.
const SHORT_CATEGORY_CHARS: usize = 3;

/// Raw emotion words: the final catch-all.
const EMOTION_WORDS: &[&str] = &[
    "笑", "哭", "生气", "怒", "laugh", "cry", "angry", "smile", "开心", "委屈", "震惊",
];

static LOOSE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Japanese syllabaries
        r"[\p{Hiragana}\p{Katakana}]",
        r"cute|moe|anime|kawaii|chibi|萌|可爱|二次元|动漫",
        r"chan|kun|sama|senpai|酱|桑|喵",
        r"face|emoji|表情|脸|颜",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static COMPANION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"\d+", r"[a-z]{2,}", r"\p{Han}{1,3}"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Whether `record` belongs to the anime-styled subset.
#[must_use]
pub fn is_anime_tagged(record: &EmojiRecord) -> bool {
    is_anime(&record.name, &record.category)
}

/// Heuristic over raw name and category strings.
#[must_use]
pub fn is_anime(name: &str, category: &str) -> bool {
    let name = name.to_lowercase();
    let category = category.to_lowercase();
    let text = format!("{name} {category}");

    matches_known_term(&name, &category)
        || matches_loose_pattern(&text)
        || matches_cute_with_companion(&text)
        || matches_short_category(&category, &text)
        || contains_any(&text, EMOTION_WORDS)
}

fn matches_known_term(name: &str, category: &str) -> bool {
    ANIME_TERMS
        .iter()
        .any(|term| name.contains(term) || category.contains(term))
}

fn matches_loose_pattern(text: &str) -> bool {
    LOOSE_PATTERNS.iter().any(|re| re.is_match(text))
}

fn matches_cute_with_companion(text: &str) -> bool {
    contains_any(text, CUTE_WORDS) && COMPANION_PATTERNS.iter().any(|re| re.is_match(text))
}

fn matches_short_category(category: &str, text: &str) -> bool {
    category.trim().chars().count() <= SHORT_CATEGORY_CHARS
        && contains_any(text, SHORT_CATEGORY_CUTE_WORDS)
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}
