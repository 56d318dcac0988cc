//! 预处理：规范化器、格式标准化器、过滤器与掩码器
//!
//! 每个实现都是一个 [`TextTransform`](crate::transform::TextTransform)，构造时由查找表
//! 与专用正则组装出一份有序规则列表。

mod filters;
mod maskers;
mod normalizers;
mod standardizers;

pub use filters::{
    DiacriticFilter, DigitFilter, EmojiFilter, HTMLTagFilter, HashtagFilter, MentionFilter,
    NonPersianLetterFilter, PunctuationFilter, RepeatedLetterFilter, StopWordFilter,
};
pub use maskers::{EmailMasker, URLMasker};
pub use normalizers::{
    AlphabetNormalizer, ArabicUnicodeNormalizer, DigitNormalizer, PunctuationNormalizer,
};
pub use standardizers::{PunctuationSpacingStandardizer, SpacingStandardizer};

use crate::transform::{char_class, Replacement};

/// 查找表 → 规则：每组变体字符编译为一个字符类，原样替换为目标
fn mapping_rules(table: &[(&str, &str)]) -> Vec<(String, Replacement)> {
    table
        .iter()
        .map(|(sources, target)| {
            (
                format!("[{}]", char_class(sources)),
                Replacement::literal(*target),
            )
        })
        .collect()
}
