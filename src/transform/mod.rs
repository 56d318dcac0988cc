//! Transform 契约
//!
//! 所有处理单元（过滤器、规范化器、分词器、管道本身）都实现 [`Transform`]：
//! 既可以处理单条文本，也可以处理文本序列。文本到文本的改写实现
//! [`TextTransform`]，由统一的分派逻辑处理单值/序列输入。

mod rules;
mod types;

pub use rules::{apply_patterns, compile_patterns, Replacement, Rule, RuleSet};
pub(crate) use rules::char_class;
pub use types::{Batch, Items, Seq, Value};

use crate::error::Result;

/// 处理单元
///
/// 构造后只持有配置，调用之间没有可变状态，因此可以跨线程共享。
pub trait Transform: Send + Sync {
    /// 训练钩子；默认什么都不做
    fn fit(&mut self, _x: &Value) -> Result<()> {
        Ok(())
    }

    fn transform(&self, x: Value) -> Result<Value>;

    fn fit_transform(&mut self, x: Value) -> Result<Value> {
        self.fit(&x)?;
        self.transform(x)
    }

    /// 直接调用，等价于 `transform`
    fn apply<X>(&self, x: X) -> Result<Value>
    where
        X: Into<Value>,
        Self: Sized,
    {
        self.transform(x.into())
    }
}

/// 文本到文本的改写
///
/// 只需实现 `transform_text`；单值与序列的分派由 [`Transform`] 的统一实现完成。
pub trait TextTransform: Clone + Send + Sync + 'static {
    fn transform_text(&self, text: &str) -> String;
}

impl<T: TextTransform> Transform for T {
    fn transform(&self, x: Value) -> Result<Value> {
        match x {
            Value::Text(text) => Ok(Value::Text(self.transform_text(&text))),
            other => {
                let this = self.clone();
                for_each_text(other, move |text| Ok(Value::Text(this.transform_text(&text))))
            }
        }
    }
}

/// 单值/序列分派
///
/// - 单条文本：直接调用 `f`
/// - 文本序列：返回惰性序列，逐元素调用 `f`，保持顺序与长度
/// - 其他输入：`InputType`
///
/// 已物化的列表会先整体校验元素类型，惰性序列则在拉取到非文本元素时失败。
pub(crate) fn for_each_text<F>(x: Value, f: F) -> Result<Value>
where
    F: Fn(String) -> Result<Value> + Send + 'static,
{
    match x {
        Value::Text(text) => f(text),
        Value::List(items) => {
            if let Some(bad) = items.iter().find(|item| item.as_text().is_none()) {
                return Err(bad.type_error());
            }
            Ok(Value::lazy(items.into_iter().map(move |item| match item {
                Value::Text(text) => f(text),
                other => Err(other.type_error()),
            })))
        }
        Value::Seq(seq) => Ok(Value::lazy(seq.map(move |item| match item? {
            Value::Text(text) => f(text),
            other => Err(other.type_error()),
        }))),
        other => Err(other.type_error()),
    }
}
