//! 分块分词器
//!
//! 把长文本编码为固定上限的窗口，每个窗口以 `<cls>` 开头、`<sep>` 结尾，
//! 输出 `input_ids` / `attention_mask` / `token_type_ids` 三个并行数组。

use std::path::Path;
use std::sync::Arc;

use super::vocab::{HfVocab, SubwordVocab};
use crate::config::ChunkedTokenizerConfig;
use crate::error::{Error, Result};
use crate::hub::Hub;
use crate::transform::{for_each_text, Batch, Transform, Value};

pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
pub const CLS_TOKEN: &str = "<cls>";
pub const SEP_TOKEN: &str = "<sep>";

/// Hub 上的默认词表资源
pub const TOKENIZER_RESOURCE: &str = "albert_persian_tokenizer.json";

/// 单条编码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub tokens: Vec<String>,
    pub ids: Vec<u32>,
}

/// 分块分词器
///
/// 四个特殊 token 的 id 在构造时解析，缺失即失败。
pub struct ChunkedTokenizer<V: SubwordVocab> {
    vocab: Arc<V>,
    config: ChunkedTokenizerConfig,
    pad_id: u32,
    unk_id: u32,
    cls_id: u32,
    sep_id: u32,
}

impl<V: SubwordVocab> Clone for ChunkedTokenizer<V> {
    fn clone(&self) -> Self {
        Self {
            vocab: Arc::clone(&self.vocab),
            config: self.config.clone(),
            pad_id: self.pad_id,
            unk_id: self.unk_id,
            cls_id: self.cls_id,
            sep_id: self.sep_id,
        }
    }
}

impl ChunkedTokenizer<HfVocab> {
    /// 从 `tokenizer.json` 加载
    pub fn from_file(path: impl AsRef<Path>, config: ChunkedTokenizerConfig) -> Result<Self> {
        Self::new(HfVocab::from_file(path)?, config)
    }

    /// 通过 Hub 获取默认词表
    pub fn from_hub(hub: &Hub, config: ChunkedTokenizerConfig) -> Result<Self> {
        let path = hub.get_resource(TOKENIZER_RESOURCE)?;
        Self::from_file(path, config)
    }
}

impl<V: SubwordVocab> ChunkedTokenizer<V> {
    pub fn new(vocab: V, config: ChunkedTokenizerConfig) -> Result<Self> {
        Self::with_shared_vocab(Arc::new(vocab), config)
    }

    pub fn with_shared_vocab(vocab: Arc<V>, config: ChunkedTokenizerConfig) -> Result<Self> {
        config.validate()?;

        let require = |token: &str| {
            vocab.piece_to_id(token).ok_or_else(|| Error::MissingToken {
                token: token.to_string(),
            })
        };
        let pad_id = require(PAD_TOKEN)?;
        let unk_id = require(UNK_TOKEN)?;
        let cls_id = require(CLS_TOKEN)?;
        let sep_id = require(SEP_TOKEN)?;

        tracing::debug!(
            "ChunkedTokenizer: model_max_length={}, stride={}, padding={}, truncation={}",
            config.model_max_length,
            config.stride,
            config.enable_padding,
            config.enable_truncation
        );

        Ok(Self {
            vocab,
            config,
            pad_id,
            unk_id,
            cls_id,
            sep_id,
        })
    }

    pub fn config(&self) -> &ChunkedTokenizerConfig {
        &self.config
    }

    pub fn pad_token_id(&self) -> u32 {
        self.pad_id
    }

    pub fn unk_token_id(&self) -> u32 {
        self.unk_id
    }

    pub fn cls_token_id(&self) -> u32 {
        self.cls_id
    }

    pub fn sep_token_id(&self) -> u32 {
        self.sep_id
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.piece_to_id(token)
    }

    pub fn id_to_token(&self, id: u32) -> Option<String> {
        self.vocab.id_to_piece(id)
    }

    /// 编码单条文本；`add_special_tokens` 时首尾加 `[CLS]` / `[SEP]`
    pub fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Encoding> {
        let mut tokens = self.vocab.encode_pieces(text)?;
        let mut ids = self.vocab.encode_ids(text)?;

        if add_special_tokens {
            tokens.insert(0, "[CLS]".to_string());
            tokens.push("[SEP]".to_string());
            ids.insert(0, self.cls_id);
            ids.push(self.sep_id);
        }
        Ok(Encoding { tokens, ids })
    }

    /// 按窗口切分 id，每个窗口包上 `<cls>` / `<sep>`
    ///
    /// 未开启截断时只输出第一个窗口，其余丢弃。
    pub fn chunk_ids(&self, ids: &[u32]) -> Vec<Vec<u32>> {
        let max_body_len = self.config.model_max_length - 2;
        let stride = self.config.stride;
        let mut chunks = Vec::new();

        let mut start = 0;
        while start < ids.len() {
            let end = start + max_body_len;
            let body = &ids[start..end.min(ids.len())];

            let mut chunk = Vec::with_capacity(body.len() + 2);
            chunk.push(self.cls_id);
            chunk.extend_from_slice(body);
            chunk.push(self.sep_id);
            chunks.push(chunk);

            if !self.config.enable_truncation || end >= ids.len() {
                break;
            }
            start = if stride > 0 { end - stride } else { end };
        }
        chunks
    }

    /// 右侧填充到 `model_max_length`；超长时截断到恰好该长度
    pub fn pad(&self, ids: &[u32]) -> Vec<u32> {
        let max_len = self.config.model_max_length;
        if ids.len() >= max_len {
            return ids[..max_len].to_vec();
        }
        let mut padded = ids.to_vec();
        padded.resize(max_len, self.pad_id);
        padded
    }

    /// 分块编码
    pub fn tokenize(&self, text: &str) -> Result<Batch> {
        let max_len = self.config.model_max_length;
        let mut batch = Batch::default();

        if text.trim().is_empty() {
            let ids = self.pad(&[self.cls_id, self.sep_id]);
            let mut mask = vec![0; max_len];
            mask[0] = 1;
            mask[1] = 1;
            batch.push(to_i64(&ids), mask);
            return Ok(batch);
        }

        let ids = self.vocab.encode_ids(text)?;
        for chunk in self.chunk_ids(&ids) {
            if self.config.enable_padding {
                let real = chunk.len().min(max_len);
                let padded = self.pad(&chunk);
                let mut mask = vec![1; real];
                mask.resize(max_len, 0);
                batch.push(to_i64(&padded), mask);
            } else {
                let mask = vec![1; chunk.len()];
                batch.push(to_i64(&chunk), mask);
            }
        }
        Ok(batch)
    }
}

fn to_i64(ids: &[u32]) -> Vec<i64> {
    ids.iter().map(|&id| i64::from(id)).collect()
}

impl<V: SubwordVocab + 'static> Transform for ChunkedTokenizer<V> {
    fn transform(&self, x: Value) -> Result<Value> {
        match x {
            Value::Text(text) => Ok(Value::Batch(self.tokenize(&text)?)),
            other => {
                let this = self.clone();
                for_each_text(other, move |text| Ok(Value::Batch(this.tokenize(&text)?)))
            }
        }
    }
}

impl<V: SubwordVocab> std::fmt::Debug for ChunkedTokenizer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedTokenizer")
            .field("config", &self.config)
            .field("pad_id", &self.pad_id)
            .field("cls_id", &self.cls_id)
            .field("sep_id", &self.sep_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenization::vocab::fake::FakeVocab;
    use proptest::prelude::*;

    fn config(max_len: usize, stride: usize, padding: bool, truncation: bool) -> ChunkedTokenizerConfig {
        ChunkedTokenizerConfig {
            model_max_length: max_len,
            stride,
            enable_padding: padding,
            enable_truncation: truncation,
        }
    }

    fn numbered_text(n: usize) -> (FakeVocab, String) {
        let (vocab, words) = FakeVocab::numbered(n);
        (vocab, words.join(" "))
    }

    #[test]
    fn test_empty_input_yields_single_padded_chunk() {
        let (vocab, _) = FakeVocab::numbered(3);
        let tokenizer = ChunkedTokenizer::new(vocab, config(8, 0, false, false)).unwrap();

        for text in ["", "   \n "] {
            let batch = tokenizer.tokenize(text).unwrap();
            assert_eq!(batch.len(), 1);
            assert_eq!(batch.input_ids[0], vec![2, 3, 0, 0, 0, 0, 0, 0]);
            assert_eq!(batch.attention_mask[0], vec![1, 1, 0, 0, 0, 0, 0, 0]);
            assert_eq!(batch.token_type_ids[0], vec![0; 8]);
        }
    }

    #[test]
    fn test_stride_chunking_window_starts() {
        let (vocab, text) = numbered_text(25);
        let tokenizer = ChunkedTokenizer::new(vocab, config(10, 2, false, true)).unwrap();

        let batch = tokenizer.tokenize(&text).unwrap();
        assert_eq!(batch.len(), 4);

        // w{i} 的 id 为 i + 4，窗口首个正文 id 即起点
        let starts: Vec<i64> = batch.input_ids.iter().map(|chunk| chunk[1] - 4).collect();
        assert_eq!(starts, vec![0, 6, 12, 18]);

        let last = batch.input_ids.last().unwrap();
        assert_eq!(last[last.len() - 2], 24 + 4);
        assert_eq!(*last.last().unwrap(), 3);
        for chunk in &batch.input_ids {
            assert_eq!(chunk[0], 2);
            assert!(chunk.len() <= 10);
        }
    }

    #[test]
    fn test_no_stride_windows_do_not_overlap() {
        let (vocab, text) = numbered_text(20);
        let tokenizer = ChunkedTokenizer::new(vocab, config(10, 0, false, true)).unwrap();

        let batch = tokenizer.tokenize(&text).unwrap();
        let starts: Vec<i64> = batch.input_ids.iter().map(|chunk| chunk[1] - 4).collect();
        assert_eq!(starts, vec![0, 8, 16]);
    }

    #[test]
    fn test_truncation_off_drops_remaining_windows() {
        let (vocab, text) = numbered_text(25);
        let tokenizer = ChunkedTokenizer::new(vocab, config(10, 0, false, false)).unwrap();

        let batch = tokenizer.tokenize(&text).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.input_ids[0], vec![2, 4, 5, 6, 7, 8, 9, 10, 11, 3]);
    }

    #[test]
    fn test_padding_on_pads_every_chunk() {
        let (vocab, text) = numbered_text(12);
        let tokenizer = ChunkedTokenizer::new(vocab, config(10, 0, true, true)).unwrap();

        let batch = tokenizer.tokenize(&text).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.input_ids[1], vec![2, 12, 13, 14, 15, 3, 0, 0, 0, 0]);
        assert_eq!(batch.attention_mask[1], vec![1, 1, 1, 1, 1, 1, 0, 0, 0, 0]);
        assert!(batch.input_ids.iter().all(|chunk| chunk.len() == 10));
    }

    #[test]
    fn test_pad_hard_truncates_long_sequences() {
        let (vocab, _) = FakeVocab::numbered(1);
        let tokenizer = ChunkedTokenizer::new(vocab, config(4, 0, true, false)).unwrap();

        assert_eq!(tokenizer.pad(&[2, 7, 8, 9, 10, 3]), vec![2, 7, 8, 9]);
        assert_eq!(tokenizer.pad(&[2, 3]), vec![2, 3, 0, 0]);
    }

    #[test]
    fn test_missing_special_token_fails() {
        let vocab = FakeVocab::with_specials(["<pad>", "<unk>", "<cls>"], ["سلام"]);
        let err = ChunkedTokenizer::new(vocab, ChunkedTokenizerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingToken { ref token } if token == "<sep>"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (vocab, _) = FakeVocab::numbered(1);
        let err = ChunkedTokenizer::new(vocab, config(10, 8, false, true)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_encode_with_and_without_special_tokens() {
        let vocab = FakeVocab::new(["سلام", "دنیا"]);
        let tokenizer = ChunkedTokenizer::new(vocab, ChunkedTokenizerConfig::default()).unwrap();

        let plain = tokenizer.encode("سلام دنیا", false).unwrap();
        assert_eq!(plain.ids, vec![4, 5]);

        let wrapped = tokenizer.encode("سلام دنیا", true).unwrap();
        assert_eq!(wrapped.tokens, vec!["[CLS]", "سلام", "دنیا", "[SEP]"]);
        assert_eq!(wrapped.ids, vec![2, 4, 5, 3]);

        assert_eq!(tokenizer.token_to_id("دنیا"), Some(5));
        assert_eq!(tokenizer.token_to_id("کتاب"), None);
        assert_eq!(tokenizer.id_to_token(4).as_deref(), Some("سلام"));
    }

    #[test]
    fn test_transform_on_sequence_yields_batches() {
        let (vocab, _) = FakeVocab::numbered(3);
        let tokenizer = ChunkedTokenizer::new(vocab, config(6, 0, true, false)).unwrap();

        let batches = tokenizer
            .apply(vec!["w0 w1", ""])
            .unwrap()
            .into_list()
            .unwrap();
        assert_eq!(batches.len(), 2);

        let first = batches.into_iter().next().unwrap().into_batch().unwrap();
        assert_eq!(first.input_ids[0], vec![2, 4, 5, 3, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_chunks_are_bounded_and_wrapped(
            n in 1usize..60,
            max_len in 3usize..16,
            stride_seed in 0usize..16,
        ) {
            let stride = stride_seed % (max_len - 2);
            let (vocab, text) = numbered_text(n);
            let tokenizer =
                ChunkedTokenizer::new(vocab, config(max_len, stride, false, true)).unwrap();

            let batch = tokenizer.tokenize(&text).unwrap();
            prop_assert!(!batch.is_empty());
            for (ids, mask) in batch.input_ids.iter().zip(&batch.attention_mask) {
                prop_assert!(ids.len() <= max_len);
                prop_assert_eq!(ids[0], 2);
                prop_assert_eq!(*ids.last().unwrap(), 3);
                prop_assert_eq!(ids.len(), mask.len());
            }
            let last = batch.input_ids.last().unwrap();
            prop_assert_eq!(last[last.len() - 2], (n - 1) as i64 + 4);
        }
    }
}
