//! 词级分词器
//!
//! 将输入文本分割为：词（字母、数字、组合符号、ZWNJ）、空白、符号。
//! 空白不输出；每个符号字符单独成为一个 token。

use crate::data::ZWNJ;
use crate::error::Result;
use crate::transform::{for_each_text, Transform, Value};

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// 字母/数字序列（含 ZWNJ 与组合符号）
    Word,
    /// 空白符序列
    Whitespace,
    /// 标点/符号（单字符）
    Symbol,
}

/// Token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// 在原文中的起始字节索引
    pub start: usize,
    /// 在原文中的结束字节索引（不含）
    pub end: usize,
}

/// 词级分词器
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// 按字符类型切分，保留空白 token 与字节位置
    pub fn spans(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current: Option<(TokenKind, usize)> = None;

        for (idx, ch) in text.char_indices() {
            let kind = Self::classify_char(ch);

            if let Some((current_kind, start)) = current {
                if current_kind == kind && kind != TokenKind::Symbol {
                    continue;
                }
                tokens.push(Token {
                    text: text[start..idx].to_string(),
                    kind: current_kind,
                    start,
                    end: idx,
                });
            }
            current = Some((kind, idx));
        }

        if let Some((kind, start)) = current {
            tokens.push(Token {
                text: text[start..].to_string(),
                kind,
                start,
                end: text.len(),
            });
        }

        tokens
    }

    /// 分词，只保留词与符号
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        Self::spans(text)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| t.text)
            .collect()
    }

    /// 字符分类
    fn classify_char(ch: char) -> TokenKind {
        if ch.is_alphanumeric() || ch == ZWNJ || ch == '_' || is_combining_mark(ch) {
            TokenKind::Word
        } else if ch.is_whitespace() {
            TokenKind::Whitespace
        } else {
            TokenKind::Symbol
        }
    }
}

/// 阿拉伯变音符号与其他常见组合符号
fn is_combining_mark(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06ED}'
        | '\u{0300}'..='\u{036F}'
    )
}

fn to_list(tokens: Vec<String>) -> Value {
    Value::List(tokens.into_iter().map(Value::Text).collect())
}

impl Transform for WordTokenizer {
    /// 单条文本 → 词列表；文本序列 → 惰性的词列表序列
    fn transform(&self, x: Value) -> Result<Value> {
        let this = *self;
        for_each_text(x, move |text| Ok(to_list(this.tokenize(&text))))
    }
}
