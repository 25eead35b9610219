// ============================================
// src/catalog.rs
// ローマ字 → かな の対応表 (ひらがな / カタカナ)
// ============================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// ローマ字とかなの1組 (例: "ka" → "か")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphPair {
    pub key: &'static str,   // ローマ字
    pub value: &'static str, // かな
}

const fn pair(key: &'static str, value: &'static str) -> GlyphPair {
    GlyphPair { key, value }
}

/// 出題する文字の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    #[default]
    Hiragana,
    Katakana,
}

impl Script {
    pub const ALL: [Script; 2] = [Script::Hiragana, Script::Katakana];

    pub fn name(self) -> &'static str {
        match self {
            Script::Hiragana => "Hiragana",
            Script::Katakana => "Katakana",
        }
    }

    /// もう一方の種類
    pub fn toggled(self) -> Self {
        match self {
            Script::Hiragana => Script::Katakana,
            Script::Katakana => Script::Hiragana,
        }
    }

    pub fn catalog(self) -> &'static Catalog {
        match self {
            Script::Hiragana => &HIRAGANA,
            Script::Katakana => &KATAKANA,
        }
    }
}

/// 読み取り専用の対応表
#[derive(Debug)]
pub struct Catalog {
    script: Script,
    pairs: &'static [GlyphPair],
}

impl Catalog {
    pub fn script(&self) -> Script {
        self.script
    }

    pub fn pairs(&self) -> &'static [GlyphPair] {
        self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// ローマ字からかなを引く。無ければ `None`
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.pairs.iter().find(|p| p.key == key).map(|p| p.value)
    }
}

/// どちらの表でも収まる最大の行数
pub fn smallest_catalog_len() -> usize {
    Script::ALL.iter().map(|s| s.catalog().len()).min().unwrap_or(0)
}

// --------------------------------------------------
// 対応表データ
// --------------------------------------------------

static HIRAGANA: Catalog = Catalog {
    script: Script::Hiragana,
    pairs: HIRAGANA_PAIRS,
};

static KATAKANA: Catalog = Catalog {
    script: Script::Katakana,
    pairs: KATAKANA_PAIRS,
};

const HIRAGANA_PAIRS: &[GlyphPair] = &[
    // 母音
    pair("a", "あ"), pair("e", "え"), pair("i", "い"), pair("o", "お"), pair("u", "う"),
    // か行
    pair("ka", "か"), pair("ke", "け"), pair("ki", "き"), pair("ko", "こ"), pair("ku", "く"),
    // さ行
    pair("sa", "さ"), pair("se", "せ"), pair("shi", "し"), pair("so", "そ"), pair("su", "す"),
    // た行
    pair("ta", "た"), pair("te", "て"), pair("chi", "ち"), pair("to", "と"), pair("tsu", "つ"),
    // な行
    pair("na", "な"), pair("ne", "ね"), pair("ni", "に"), pair("no", "の"), pair("nu", "ぬ"),
    // は行
    pair("ha", "は"), pair("he", "へ"), pair("hi", "ひ"), pair("ho", "ほ"), pair("fu", "ふ"),
    // ま行
    pair("ma", "ま"), pair("me", "め"), pair("mi", "み"), pair("mo", "も"), pair("mu", "む"),
    // や行
    pair("ya", "や"), pair("yu", "ゆ"), pair("yo", "よ"),
    // ら行
    pair("ra", "ら"), pair("re", "れ"), pair("ri", "り"), pair("ro", "ろ"), pair("ru", "る"),
    // わ行・ん
    pair("wa", "わ"), pair("wo", "を"), pair("n", "ん"),
    // 拗音
    pair("kya", "きゃ"), pair("kyu", "きゅ"), pair("kyo", "きょ"),
    pair("sha", "しゃ"), pair("shu", "しゅ"), pair("sho", "しょ"),
    pair("cha", "ちゃ"), pair("chu", "ちゅ"), pair("cho", "ちょ"),
    pair("nya", "にゃ"), pair("nyu", "にゅ"), pair("nyo", "にょ"),
    pair("hya", "ひゃ"), pair("hyu", "ひゅ"), pair("hyo", "ひょ"),
    pair("mya", "みゃ"), pair("myu", "みゅ"), pair("myo", "みょ"),
    pair("rya", "りゃ"), pair("ryu", "りゅ"), pair("ryo", "りょ"),
];

const KATAKANA_PAIRS: &[GlyphPair] = &[
    pair("a", "ア"), pair("e", "エ"), pair("i", "イ"), pair("o", "オ"), pair("u", "ウ"),
    pair("ka", "カ"), pair("ke", "ケ"), pair("ki", "キ"), pair("ko", "コ"), pair("ku", "ク"),
    pair("sa", "サ"), pair("se", "セ"), pair("shi", "シ"), pair("so", "ソ"), pair("su", "ス"),
    pair("ta", "タ"), pair("te", "テ"), pair("chi", "チ"), pair("to", "ト"), pair("tsu", "ツ"),
    pair("na", "ナ"), pair("ne", "ネ"), pair("ni", "ニ"), pair("no", "ノ"), pair("nu", "ヌ"),
    pair("ha", "ハ"), pair("he", "ヘ"), pair("hi", "ヒ"), pair("ho", "ホ"), pair("fu", "フ"),
    pair("ma", "マ"), pair("me", "メ"), pair("mi", "ミ"), pair("mo", "モ"), pair("mu", "ム"),
    pair("ya", "ヤ"), pair("yu", "ユ"), pair("yo", "ヨ"),
    pair("ra", "ラ"), pair("re", "レ"), pair("ri", "リ"), pair("ro", "ロ"), pair("ru", "ル"),
    pair("wa", "ワ"), pair("wo", "ヲ"), pair("n", "ン"),
    pair("kya", "キャ"), pair("kyu", "キュ"), pair("kyo", "キョ"),
    pair("sha", "シャ"), pair("shu", "シュ"), pair("sho", "ショ"),
    pair("cha", "チャ"), pair("chu", "チュ"), pair("cho", "チョ"),
    pair("nya", "ニャ"), pair("nyu", "ニュ"), pair("nyo", "ニョ"),
    pair("hya", "ヒャ"), pair("hyu", "ヒュ"), pair("hyo", "ヒョ"),
    pair("mya", "ミャ"), pair("myu", "ミュ"), pair("myo", "ミョ"),
    pair("rya", "リャ"), pair("ryu", "リュ"), pair("ryo", "リョ"),
];
