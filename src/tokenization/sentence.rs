//! 句子切分：句末标点后接空白或文本结尾处断句

use regex::Regex;

use crate::data::SENTENCE_TERMINATORS;
use crate::error::Result;
use crate::transform::{char_class, for_each_text, Transform, Value};

#[derive(Debug, Clone)]
pub struct SentenceTokenizer {
    boundary: Regex,
}

impl SentenceTokenizer {
    pub fn new() -> Result<Self> {
        let boundary = Regex::new(&format!(
            r"[{}]+(?:\s+|$)",
            char_class(SENTENCE_TERMINATORS)
        ))?;
        Ok(Self { boundary })
    }

    /// 切分为句子（去除首尾空白，丢弃空句）
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut last = 0;

        for m in self.boundary.find_iter(text) {
            let sentence = text[last..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            last = m.end();
        }

        let rest = text[last..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}

impl Transform for SentenceTokenizer {
    fn transform(&self, x: Value) -> Result<Value> {
        let this = self.clone();
        for_each_text(x, move |text| {
            Ok(Value::List(
                this.tokenize(&text).into_iter().map(Value::Text).collect(),
            ))
        })
    }
}
