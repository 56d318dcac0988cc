//! 空白与标点间距标准化

use crate::error::Result;
use crate::transform::{char_class, compile_patterns, RuleSet, TextTransform};

/// 空白标准化
///
/// - 水平空白串 → 单个空格
/// - 3 个及以上换行 → 2 个
/// - ZWNJ 紧跟空白 → 该空白（字母之间的 ZWNJ 保留）
/// - 去除首尾空白
///
/// 幂等：对输出再执行一次结果不变。
#[derive(Debug, Clone)]
pub struct SpacingStandardizer {
    rules: RuleSet,
}

impl SpacingStandardizer {
    pub fn new() -> Result<Self> {
        let rules = compile_patterns([
            (r"\x{200C}+(\s)", "${1}"),
            (r"[^\S\n]+", " "),
            (r" ?\n ?", "\n"),
            (r"\n{3,}", "\n\n"),
        ])?;
        Ok(Self { rules })
    }
}

impl TextTransform for SpacingStandardizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text).trim().to_string()
    }
}

/// 标点间距标准化
///
/// 去掉标点前与引号/括号内侧的空格，在句末或闭合标点后补一个空格。
/// 最后一个标点之后同样保留一个空格。
#[derive(Debug, Clone)]
pub struct PunctuationSpacingStandardizer {
    rules: RuleSet,
}

impl PunctuationSpacingStandardizer {
    pub fn new() -> Result<Self> {
        let close = char_class(".,;:!?،؛؟…»)]}");
        let open = char_class("«([{");

        let rules = compile_patterns([
            (format!(r"\s+([{close}])"), "${1}"),
            (format!(r"([{open}])\s+"), "${1}"),
            (format!(r"([^\s{open}])([{open}])"), "${1} ${2}"),
            // 小数、时间等数字内部的标点不补空格
            (format!(r"([{close}]+)([^\s\d{close}])"), "${1} ${2}"),
            (format!(r"([{close}]+)\s*$"), "${1} "),
        ])?;
        Ok(Self { rules })
    }
}

impl TextTransform for PunctuationSpacingStandardizer {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text)
    }
}
