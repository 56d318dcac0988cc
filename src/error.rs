//! 统一错误类型
//!
//! 核心从不吞掉阶段错误：任何一个 Transform 失败都会原样向上传播，
//! 整条 Pipeline 调用随之中止。

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// 输入既不是单条文本也不是文本序列
    #[error("Input must be a string or a Iterable of strings.")]
    InputType { found: &'static str },

    /// 子词词表缺少必需的边界 token
    #[error("Required token missing from vocabulary: {token}")]
    MissingToken { token: String },

    #[error("File {name} is not recognized as a known resource")]
    UnknownResource { name: String },

    /// 缓存文件哈希与登记值不一致（文件已被删除）
    #[error("Hash mismatch for {name}. Expected {expected}, got {actual}")]
    Integrity {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to download {name}: {reason}")]
    Fetch { name: String, reason: String },

    #[error("Unknown {task} model '{name}'. Available: {available:?}")]
    UnknownModel {
        task: &'static str,
        name: String,
        available: &'static [&'static str],
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("vocabulary error: {0}")]
    Vocab(String),

    #[error("inference error: {0}")]
    Inference(String),

    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_message_is_exact() {
        let err = Error::InputType { found: "number" };
        assert_eq!(
            err.to_string(),
            "Input must be a string or a Iterable of strings."
        );
    }

    #[test]
    fn test_integrity_message_names_both_hashes() {
        let err = Error::Integrity {
            name: "albert_persian_tokenizer.json".to_string(),
            expected: "abc".to_string(),
            actual: "def".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("Hash mismatch"));
        assert!(message.contains("albert_persian_tokenizer.json"));
        assert!(message.contains("abc"));
        assert!(message.contains("def"));
    }
}
