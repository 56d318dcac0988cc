//! 过滤器：删除（或替换为给定字符串）某一类字符/片段，结果去除首尾空白

use std::collections::HashSet;
use std::sync::Arc;

use crate::data;
use crate::error::Result;
use crate::transform::{char_class, compile_patterns, Replacement, RuleSet, TextTransform};

fn apply_stripped(rules: &RuleSet, text: &str) -> String {
    rules.apply(text).trim().to_string()
}

/// 单条规则的过滤器：`pattern` → `replace_with`
macro_rules! single_rule_filter {
    ($(#[$meta:meta])* $name:ident, $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            rules: RuleSet,
        }

        impl $name {
            pub fn new() -> Result<Self> {
                Self::with_replacement($default)
            }

            pub fn with_replacement(replace_with: &str) -> Result<Self> {
                Ok(Self {
                    rules: compile_patterns([(
                        Self::pattern(),
                        Replacement::literal(replace_with),
                    )])?,
                })
            }
        }

        impl TextTransform for $name {
            fn transform_text(&self, text: &str) -> String {
                apply_stripped(&self.rules, text)
            }
        }
    };
}

single_rule_filter!(
    /// 表情符号过滤（含变体选择符与 ZWJ 组合序列）
    EmojiFilter,
    ""
);

impl EmojiFilter {
    fn pattern() -> String {
        let ranges: String = data::EMOJI_RANGES
            .iter()
            .map(|(start, end)| format!(r"\x{{{:X}}}-\x{{{:X}}}", *start as u32, *end as u32))
            .collect();
        format!(r"(?:[{}][\x{{FE0F}}\x{{200D}}]*)+", ranges)
    }
}

single_rule_filter!(
    /// 变音符号过滤
    DiacriticFilter,
    ""
);

impl DiacriticFilter {
    fn pattern() -> String {
        format!("[{}]", char_class(data::DIACRITICS))
    }
}

single_rule_filter!(
    /// HTML 标签过滤，默认替换为一个空格
    HTMLTagFilter,
    " "
);

impl HTMLTagFilter {
    fn pattern() -> String {
        r"<[^>]+>".to_string()
    }
}

single_rule_filter!(MentionFilter, " ");

impl MentionFilter {
    fn pattern() -> String {
        r"@[^\s]+".to_string()
    }
}

single_rule_filter!(HashtagFilter, " ");

impl HashtagFilter {
    fn pattern() -> String {
        r"#[^\s]+".to_string()
    }
}

single_rule_filter!(
    /// 数字过滤（波斯、阿拉伯、英文、全角），逐字符替换
    DigitFilter,
    ""
);

impl DigitFilter {
    fn pattern() -> String {
        format!("[{}]", char_class(&data::numbers()))
    }
}

single_rule_filter!(PunctuationFilter, "");

impl PunctuationFilter {
    fn pattern() -> String {
        format!("[{}]", char_class(data::PUNCTUATIONS))
    }
}

/// 重复字母过滤
///
/// 先删除延伸符（ـ），再把同一字母连续 3 次以上的重复压缩为 2 次。
#[derive(Debug, Clone)]
pub struct RepeatedLetterFilter {
    rules: RuleSet,
}

impl RepeatedLetterFilter {
    pub fn new() -> Result<Self> {
        let rules = compile_patterns([
            (
                format!("{}+", regex::escape(&data::TATWEEL.to_string())),
                Replacement::literal(""),
            ),
            (
                r"\p{L}{3,}".to_string(),
                Replacement::with(|caps| collapse_runs(&caps[0], 2)),
            ),
        ])?;
        Ok(Self { rules })
    }
}

/// 把同一字符的连续重复截断为最多 `keep` 个
fn collapse_runs(text: &str, keep: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    let mut run = 0;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run <= keep {
            out.push(c);
        }
    }
    out
}

impl TextTransform for RepeatedLetterFilter {
    fn transform_text(&self, text: &str) -> String {
        apply_stripped(&self.rules, text)
    }
}

/// 停用词过滤
///
/// 按词（字母、组合符号与 ZWNJ 组成的串）整体匹配，子串不受影响。
#[derive(Debug, Clone)]
pub struct StopWordFilter {
    rules: RuleSet,
    stopwords: Arc<HashSet<String>>,
}

impl StopWordFilter {
    pub fn new() -> Result<Self> {
        Self::with_replacement("")
    }

    pub fn with_replacement(replace_with: &str) -> Result<Self> {
        Self::with_stopwords(data::STOPWORD_SET.iter().copied(), replace_with)
    }

    /// 使用自定义停用词表
    pub fn with_stopwords<I, S>(stopwords: I, replace_with: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stopwords: Arc<HashSet<String>> =
            Arc::new(stopwords.into_iter().map(Into::into).collect());
        let lookup = Arc::clone(&stopwords);
        let replace_with = replace_with.to_string();

        let rules = compile_patterns([(
            r"[\p{L}\p{M}\x{200C}]+",
            Replacement::with(move |caps| {
                let word = &caps[0];
                if lookup.contains(word) {
                    replace_with.clone()
                } else {
                    word.to_string()
                }
            }),
        )])?;
        Ok(Self { rules, stopwords })
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl TextTransform for StopWordFilter {
    fn transform_text(&self, text: &str) -> String {
        apply_stripped(&self.rules, text)
    }
}

/// 非波斯字符过滤
///
/// 保留波斯字母、波斯数字、核心标点、ZWNJ 与空白；可选保留英文字母/数字与变音符号。
#[derive(Debug, Clone)]
pub struct NonPersianLetterFilter {
    rules: RuleSet,
}

impl NonPersianLetterFilter {
    pub fn new() -> Result<Self> {
        Self::with_options(false, false, "")
    }

    pub fn with_options(keep_english: bool, keep_diacritics: bool, replace_with: &str) -> Result<Self> {
        let mut keep = String::new();
        keep.push_str(data::PERSIAN_LETTERS);
        keep.push_str(data::PERSIAN_DIGITS);
        keep.push_str(data::PERSIAN_PUNCTUATIONS);
        keep.push(data::ZWNJ);
        if keep_english {
            keep.push_str(data::ENGLISH_LETTERS);
            keep.push_str(data::ENGLISH_DIGITS);
        }
        if keep_diacritics {
            keep.push_str(data::DIACRITICS);
        }

        let rules = compile_patterns([(
            format!(r"[^{}\s]", char_class(&keep)),
            Replacement::literal(replace_with),
        )])?;
        Ok(Self { rules })
    }
}

impl TextTransform for NonPersianLetterFilter {
    fn transform_text(&self, text: &str) -> String {
        apply_stripped(&self.rules, text)
    }
}
