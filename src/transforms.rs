//! 序列变换：n-gram 抽取与展平

use crate::error::{Error, Result};
use crate::tokenization::WordTokenizer;
use crate::transform::{for_each_text, Items, Transform, Value};

/// n-gram 抽取
///
/// 按 n 从小到大输出：先全部 `min`-gram，再 `min+1`-gram ……
/// token 数少于 n 时该阶不产生结果。
#[derive(Debug, Clone, Copy)]
pub struct NGramExtractor {
    min: usize,
    max: usize,
    tokenizer: WordTokenizer,
}

impl NGramExtractor {
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min == 0 || max == 0 {
            return Err(Error::invalid_config("N-gram range must be greater than 0."));
        }
        if min > max {
            return Err(Error::invalid_config(
                "N-gram range must be in the form of (min, max).",
            ));
        }
        Ok(Self {
            min,
            max,
            tokenizer: WordTokenizer::new(),
        })
    }

    pub fn range(&self) -> (usize, usize) {
        (self.min, self.max)
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenizer.tokenize(text);
        (self.min..=self.max)
            .flat_map(|n| tokens.windows(n).map(|gram| gram.join(" ")))
            .collect()
    }
}

impl Transform for NGramExtractor {
    fn transform(&self, x: Value) -> Result<Value> {
        let this = *self;
        for_each_text(x, move |text| {
            Ok(Value::List(
                this.extract(&text).into_iter().map(Value::Text).collect(),
            ))
        })
    }
}

/// 展平一层：序列的序列 → 惰性平铺序列
#[derive(Debug, Clone, Copy, Default)]
pub struct Flatten;

impl Transform for Flatten {
    fn transform(&self, x: Value) -> Result<Value> {
        let outer = x.into_items()?;
        Ok(Value::lazy(outer.flat_map(|item| -> Items {
            match item.and_then(Value::into_items) {
                Ok(inner) => inner,
                Err(err) => Box::new(std::iter::once(Err(err))),
            }
        })))
    }
}
