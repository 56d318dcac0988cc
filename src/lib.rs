//! 波斯语文本规范化与分词管道
//!
//! 所有组件都实现 [`Transform`]：输入单条文本时返回单条结果，
//! 输入文本序列时逐条惰性处理。组件可由 [`Pipeline`] 串联。

pub mod config;
pub mod data;
pub mod error;
pub mod hub;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod preprocessing;
pub mod tokenization;
pub mod transform;
pub mod transforms;

pub use config::{AppConfig, ChunkedTokenizerConfig, HubConfig, NormalizerConfig, StepConfig};
pub use error::{Error, Result};
pub use hub::{Fetch, Hub, NoFetch};
pub use normalizer::Normalizer;
pub use pipeline::{Pipeline, Step};
pub use tokenization::{ChunkedTokenizer, SentenceTokenizer, WordTokenizer};
pub use transform::{Batch, TextTransform, Transform, Value};
pub use transforms::{Flatten, NGramExtractor};

use std::io::{BufRead, Write};

/// 逐行规范化：每读入一行立即写出一行，返回处理的行数
pub fn normalize_lines<R, W>(normalizer: &Normalizer, reader: R, mut writer: W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        let normalized = normalizer.normalize(&line)?;
        writeln!(writer, "{}", normalized)?;
        count += 1;
    }
    writer.flush()?;
    tracing::debug!("规范化完成: {} 行", count);
    Ok(count)
}
