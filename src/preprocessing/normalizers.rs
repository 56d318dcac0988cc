//! 字符规范化：字母、数字、标点统一，阿拉伯呈现形式展开

use unicode_normalization::UnicodeNormalization;

use super::mapping_rules;
use crate::data;
use crate::error::Result;
use crate::transform::{compile_patterns, Replacement, RuleSet, TextTransform};

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// 字母统一（阿拉伯/普什图/乌尔都变体 → 波斯字母）
#[derive(Debug, Clone)]
pub struct AlphabetNormalizer {
    rules: RuleSet,
}

impl AlphabetNormalizer {
    pub fn new() -> Result<Self> {
        let rules = compile_patterns(mapping_rules(data::ALPHABET_MAPPINGS))?;
        tracing::debug!("AlphabetNormalizer: {} 条规则", rules.len());
        Ok(Self { rules })
    }
}

impl TextTransform for AlphabetNormalizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text)
    }
}

/// 阿拉伯 Unicode 规范化
///
/// 先展开连字（﷽、ﷲ 等），再用 NFKC 折叠其余呈现形式并统一 ي/ك。
#[derive(Debug, Clone)]
pub struct ArabicUnicodeNormalizer {
    rules: RuleSet,
}

impl ArabicUnicodeNormalizer {
    pub fn new() -> Result<Self> {
        let mut table: Vec<(String, Replacement)> = data::ARABIC_LIGATURES
            .iter()
            .map(|(ligature, words)| (regex::escape(ligature), Replacement::literal(*words)))
            .collect();
        table.push((
            r"[\x{FB50}-\x{FDFF}\x{FE70}-\x{FEFC}]+".to_string(),
            Replacement::with(|caps| caps[0].nfkc().map(unify_arabic_letter).collect()),
        ));

        Ok(Self {
            rules: compile_patterns(table)?,
        })
    }
}

fn unify_arabic_letter(c: char) -> char {
    match c {
        'ي' | 'ى' => 'ی',
        'ك' => 'ک',
        'ة' => 'ه',
        other => other,
    }
}

impl TextTransform for ArabicUnicodeNormalizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text)
    }
}

/// 数字统一：阿拉伯、英文、全角数字及带圈/带括号/带点数字 → 波斯数字
#[derive(Debug, Clone)]
pub struct DigitNormalizer {
    rules: RuleSet,
}

impl DigitNormalizer {
    pub fn new() -> Result<Self> {
        let rules = compile_patterns([(
            r"[0-9\x{0660}-\x{0669}\x{FF10}-\x{FF19}\x{2460}-\x{249B}]",
            Replacement::with(|caps| caps[0].chars().map(to_persian_number).collect()),
        )])?;
        Ok(Self { rules })
    }
}

fn persian_number(n: u32) -> String {
    n.to_string()
        .chars()
        .map(|d| d.to_digit(10).map_or(d, |d| PERSIAN_DIGITS[d as usize]))
        .collect()
}

fn to_persian_number(c: char) -> String {
    let code = c as u32;
    match c {
        '0'..='9' => persian_number(code - '0' as u32),
        '\u{0660}'..='\u{0669}' => persian_number(code - 0x0660),
        '\u{FF10}'..='\u{FF19}' => persian_number(code - 0xFF10),
        // ① - ⑳
        '\u{2460}'..='\u{2473}' => persian_number(code - 0x2460 + 1),
        // ⑴ - ⒇
        '\u{2474}'..='\u{2487}' => persian_number(code - 0x2474 + 1),
        // ⒈ - ⒛
        '\u{2488}'..='\u{249B}' => persian_number(code - 0x2488 + 1),
        other => other.to_string(),
    }
}

impl TextTransform for DigitNormalizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text)
    }
}

/// 标点统一（`?` → `؟`，`,` → `،`，`%` → `٪` ...）
#[derive(Debug, Clone)]
pub struct PunctuationNormalizer {
    rules: RuleSet,
}

impl PunctuationNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: compile_patterns(mapping_rules(data::PUNCTUATION_MAPPINGS))?,
        })
    }
}

impl TextTransform for PunctuationNormalizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text)
    }
}
