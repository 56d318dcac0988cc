//! 有序规则引擎
//!
//! 构造时一次性编译 (pattern, replacement) 列表，调用时按声明顺序依次应用，
//! 每条规则的输出作为下一条规则的输入。没有优先级，列表顺序即唯一依据。

use std::fmt;
use std::sync::Arc;

use regex::{Captures, NoExpand, Regex};

use crate::error::Result;

/// 替换方式
#[derive(Clone)]
pub enum Replacement {
    /// `${1}` 风格模板
    Template(String),
    /// 原样替换（不展开 `$`）
    Literal(String),
    /// 由匹配结果计算替换文本
    With(Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>),
}

impl Replacement {
    pub fn template(template: impl Into<String>) -> Self {
        Replacement::Template(template.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Replacement::Literal(text.into())
    }

    pub fn with<F>(f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Replacement::With(Arc::new(f))
    }
}

impl From<&str> for Replacement {
    fn from(template: &str) -> Self {
        Replacement::template(template)
    }
}

impl From<String> for Replacement {
    fn from(template: String) -> Self {
        Replacement::Template(template)
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Literal(l) => f.debug_tuple("Literal").field(l).finish(),
            Replacement::With(_) => f.write_str("With(..)"),
        }
    }
}

/// 已编译规则
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    pub fn new(pattern: &str, replacement: impl Into<Replacement>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// 替换全部匹配
    pub fn replace_all(&self, text: &str) -> String {
        match &self.replacement {
            Replacement::Template(template) => {
                self.pattern.replace_all(text, template.as_str()).into_owned()
            }
            Replacement::Literal(literal) => self
                .pattern
                .replace_all(text, NoExpand(literal.as_str()))
                .into_owned(),
            Replacement::With(f) => self
                .pattern
                .replace_all(text, |caps: &Captures<'_>| f(caps))
                .into_owned(),
        }
    }
}

/// 有序规则集合（共享所有权，克隆开销为常数）
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Arc<[Rule]>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: Arc::from(rules),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        apply_patterns(text, &self.rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 按输入顺序编译规则
pub fn compile_patterns<I, P, R>(rules: I) -> Result<RuleSet>
where
    I: IntoIterator<Item = (P, R)>,
    P: AsRef<str>,
    R: Into<Replacement>,
{
    let compiled = rules
        .into_iter()
        .map(|(pattern, replacement)| Rule::new(pattern.as_ref(), replacement))
        .collect::<Result<Vec<_>>>()?;
    Ok(RuleSet::new(compiled))
}

/// 从左到右折叠：`text_{i+1} = rule_i(text_i)`
pub fn apply_patterns(text: &str, rules: &[Rule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.replace_all(&acc))
}

/// 把字符集合转成可放入 `[...]` 的转义串
pub(crate) fn char_class(chars: &str) -> String {
    chars
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect()
}
