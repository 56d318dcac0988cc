//! 默认规范化管道
//!
//! 固定顺序：字母 → 阿拉伯呈现形式 → 数字 → 标点 → 邮箱/URL 清除 →
//! 表情 → HTML → 变音符号 → 重复字母 → 非波斯字符 → 空白。

use crate::error::Result;
use crate::pipeline::{Pipeline, Step};
use crate::preprocessing::{
    AlphabetNormalizer, ArabicUnicodeNormalizer, DiacriticFilter, DigitNormalizer, EmailMasker,
    EmojiFilter, HTMLTagFilter, NonPersianLetterFilter, PunctuationNormalizer,
    RepeatedLetterFilter, SpacingStandardizer, URLMasker,
};
use crate::transform::{Transform, Value};

/// 规范化器（一条预置的 [`Pipeline`]）
#[derive(Debug)]
pub struct Normalizer {
    pipeline: Pipeline,
}

impl Normalizer {
    /// 默认步骤
    pub fn new() -> Result<Self> {
        let pipeline = Pipeline::new()
            .step("AlphabetNormalizer", AlphabetNormalizer::new()?)
            .step("ArabicUnicodeNormalizer", ArabicUnicodeNormalizer::new()?)
            .step("DigitNormalizer", DigitNormalizer::new()?)
            .step("PunctuationNormalizer", PunctuationNormalizer::new()?)
            .step("EmailMasker", EmailMasker::with_mask("")?)
            .step("URLMasker", URLMasker::with_mask("")?)
            .step("EmojiFilter", EmojiFilter::new()?)
            .step("HTMLTagFilter", HTMLTagFilter::new()?)
            .step("DiacriticFilter", DiacriticFilter::new()?)
            .step("RepeatedLetterFilter", RepeatedLetterFilter::new()?)
            .step("NonPersianLetterFilter", NonPersianLetterFilter::new()?)
            .step("SpacingStandardizer", SpacingStandardizer::new()?);
        tracing::debug!("Normalizer 使用默认步骤: {} 个", pipeline.len());
        Ok(Self { pipeline })
    }

    /// 自定义步骤
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            pipeline: Pipeline::from_steps(steps),
        }
    }

    /// 规范化单条文本
    pub fn normalize(&self, text: &str) -> Result<String> {
        self.pipeline.transform(Value::from(text))?.into_text()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}

impl Transform for Normalizer {
    fn fit(&mut self, x: &Value) -> Result<()> {
        self.pipeline.fit(x)
    }

    fn transform(&self, x: Value) -> Result<Value> {
        self.pipeline.transform(x)
    }

    fn fit_transform(&mut self, x: Value) -> Result<Value> {
        self.pipeline.fit_transform(x)
    }
}
