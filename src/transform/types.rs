//! Transform 数据类型定义
//!
//! 管道中流动的值：单条文本、文本列表、惰性序列、数值批次等。

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// 惰性序列的元素迭代器
pub type Items = Box<dyn Iterator<Item = Result<Value>> + Send>;

/// 惰性序列
///
/// 每次调用都新建，逐个拉取元素；只能通过重新调用 transform 重启，不缓存。
pub struct Seq {
    inner: Items,
}

impl Seq {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<Value>> + Send + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl Iterator for Seq {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seq(..)")
    }
}

/// 分块分词结果
///
/// 三个二维数组共享外层维度（分块数）。开启填充时内层维度固定为
/// `model_max_length`，否则每块保持自身长度。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub input_ids: Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
    pub token_type_ids: Vec<Vec<i64>>,
}

impl Batch {
    /// 追加一个分块，token type 全部为 0
    pub fn push(&mut self, ids: Vec<i64>, mask: Vec<i64>) {
        self.token_type_ids.push(vec![0; ids.len()]);
        self.input_ids.push(ids);
        self.attention_mask.push(mask);
    }

    /// 分块数量
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

/// 管道值
#[derive(Debug)]
pub enum Value {
    /// 单条文本
    Text(String),
    /// 已物化的序列（分词结果、n-gram 列表、调用方传入的文本列表）
    List(Vec<Value>),
    /// 惰性序列
    Seq(Seq),
    /// 分块分词批次
    Batch(Batch),
    /// 分类结果
    Label { label: String, score: f32 },
    /// 向量（句向量等）
    Vector(Vec<f32>),
    /// 数值标量
    Number(f64),
}

impl Value {
    /// 由迭代器构造惰性序列
    pub fn lazy<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<Value>> + Send + 'static,
    {
        Value::Seq(Seq::new(iter))
    }

    /// 值的类型名（用于错误信息）
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Seq(_) => "sequence",
            Value::Batch(_) => "batch",
            Value::Label { .. } => "label",
            Value::Vector(_) => "vector",
            Value::Number(_) => "number",
        }
    }

    pub(crate) fn type_error(&self) -> Error {
        Error::InputType { found: self.kind() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_) | Value::Seq(_))
    }

    pub fn into_text(self) -> Result<String> {
        match self {
            Value::Text(text) => Ok(text),
            other => Err(other.type_error()),
        }
    }

    pub fn into_batch(self) -> Result<Batch> {
        match self {
            Value::Batch(batch) => Ok(batch),
            other => Err(other.type_error()),
        }
    }

    /// 序列元素迭代器；List 与 Seq 之外的值返回 `InputType`
    pub fn into_items(self) -> Result<Items> {
        match self {
            Value::List(items) => Ok(Box::new(items.into_iter().map(Ok))),
            Value::Seq(seq) => Ok(Box::new(seq)),
            other => Err(other.type_error()),
        }
    }

    /// 物化序列（拉取惰性序列的全部元素）
    pub fn into_list(self) -> Result<Vec<Value>> {
        self.into_items()?.collect()
    }

    /// 物化为文本列表，任一元素不是文本即失败
    pub fn into_strings(self) -> Result<Vec<String>> {
        self.into_items()?
            .map(|item| item.and_then(Value::into_text))
            .collect()
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(texts: Vec<String>) -> Self {
        Value::List(texts.into_iter().map(Value::Text).collect())
    }
}

impl From<Vec<&str>> for Value {
    fn from(texts: Vec<&str>) -> Self {
        Value::List(texts.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Batch> for Value {
    fn from(batch: Batch) -> Self {
        Value::Batch(batch)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_strings_collects_lazy_sequence() {
        let value = Value::lazy(vec!["a", "b"].into_iter().map(|s| Ok(Value::from(s))));
        assert_eq!(value.into_strings().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_into_strings_rejects_non_text_element() {
        let value = Value::List(vec![Value::from("a"), Value::Number(1.0)]);
        let err = value.into_strings().unwrap_err();
        assert!(matches!(err, Error::InputType { found: "number" }));
    }

    #[test]
    fn test_into_text_rejects_sequence() {
        let err = Value::from(vec!["a"]).into_text().unwrap_err();
        assert!(matches!(err, Error::InputType { found: "list" }));
    }

    #[test]
    fn test_batch_push_keeps_parallel_shapes() {
        let mut batch = Batch::default();
        batch.push(vec![2, 7, 3], vec![1, 1, 1]);
        batch.push(vec![2, 3], vec![1, 1]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.token_type_ids, vec![vec![0, 0, 0], vec![0, 0]]);
        assert_eq!(batch.attention_mask[1].len(), batch.input_ids[1].len());
    }
}
