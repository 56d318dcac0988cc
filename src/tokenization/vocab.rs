//! 子词词表
//!
//! 分块分词器只依赖 [`SubwordVocab`]：片段与 id 互查，以及把文本编码为
//! 不含边界 token 的 id / 片段序列。

use std::path::Path;

use tokenizers::Tokenizer;

use crate::error::{Error, Result};

/// 固定子词词表
pub trait SubwordVocab: Send + Sync {
    /// 片段 → id；词表中没有时返回 `None`
    fn piece_to_id(&self, piece: &str) -> Option<u32>;

    fn id_to_piece(&self, id: u32) -> Option<String>;

    /// 编码为 id（不添加边界 token）
    fn encode_ids(&self, text: &str) -> Result<Vec<u32>>;

    /// 编码为片段（不添加边界 token）
    fn encode_pieces(&self, text: &str) -> Result<Vec<String>>;
}

/// HuggingFace `tokenizer.json` 词表
pub struct HfVocab {
    tokenizer: Tokenizer,
}

impl HfVocab {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            Error::Vocab(format!("无法加载分词器 '{}': {}", path.display(), e))
        })?;
        tracing::debug!("已加载子词词表: {}", path.display());
        Ok(Self { tokenizer })
    }

    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn encode(&self, text: &str) -> Result<tokenizers::Encoding> {
        self.tokenizer
            .encode(text, false)
            .map_err(|e| Error::Vocab(format!("编码失败: {}", e)))
    }
}

impl SubwordVocab for HfVocab {
    fn piece_to_id(&self, piece: &str) -> Option<u32> {
        self.tokenizer.token_to_id(piece)
    }

    fn id_to_piece(&self, id: u32) -> Option<String> {
        self.tokenizer.id_to_token(id)
    }

    fn encode_ids(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.encode(text)?.get_ids().to_vec())
    }

    fn encode_pieces(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.encode(text)?.get_tokens().to_vec())
    }
}

impl std::fmt::Debug for HfVocab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfVocab")
            .field("vocab_size", &self.vocab_size())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::SubwordVocab;
    use crate::error::Result;

    /// 按空白切分的词级词表：`<pad>`=0 `<unk>`=1 `<cls>`=2 `<sep>`=3，其余依次编号
    pub(crate) struct FakeVocab {
        ids: HashMap<String, u32>,
        pieces: Vec<String>,
    }

    impl FakeVocab {
        pub(crate) fn new<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
            Self::with_specials(["<pad>", "<unk>", "<cls>", "<sep>"], words)
        }

        pub(crate) fn with_specials<'a>(
            specials: impl IntoIterator<Item = &'a str>,
            words: impl IntoIterator<Item = &'a str>,
        ) -> Self {
            let pieces: Vec<String> = specials
                .into_iter()
                .chain(words)
                .map(str::to_string)
                .collect();
            let ids = pieces
                .iter()
                .enumerate()
                .map(|(i, p)| (p.clone(), i as u32))
                .collect();
            Self { ids, pieces }
        }

        /// `w0 .. w{n-1}`
        pub(crate) fn numbered(n: usize) -> (Self, Vec<String>) {
            let words: Vec<String> = (0..n).map(|i| format!("w{}", i)).collect();
            let vocab = Self::new(words.iter().map(String::as_str));
            (vocab, words)
        }
    }

    impl SubwordVocab for FakeVocab {
        fn piece_to_id(&self, piece: &str) -> Option<u32> {
            self.ids.get(piece).copied()
        }

        fn id_to_piece(&self, id: u32) -> Option<String> {
            self.pieces.get(id as usize).cloned()
        }

        fn encode_ids(&self, text: &str) -> Result<Vec<u32>> {
            let unk = self.ids.get("<unk>").copied().unwrap_or(0);
            Ok(text
                .split_whitespace()
                .map(|w| self.ids.get(w).copied().unwrap_or(unk))
                .collect())
        }

        fn encode_pieces(&self, text: &str) -> Result<Vec<String>> {
            Ok(text
                .split_whitespace()
                .map(|w| {
                    if self.ids.contains_key(w) {
                        w.to_string()
                    } else {
                        "<unk>".to_string()
                    }
                })
                .collect())
        }
    }
}
