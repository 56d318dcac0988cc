//! 分词：词级、句子级与分块子词分词

mod chunked;
mod sentence;
mod vocab;
mod word;

pub use chunked::{
    ChunkedTokenizer, Encoding, CLS_TOKEN, PAD_TOKEN, SEP_TOKEN, TOKENIZER_RESOURCE, UNK_TOKEN,
};
pub use sentence::SentenceTokenizer;
pub use vocab::{HfVocab, SubwordVocab};
pub use word::{Token, TokenKind, WordTokenizer};

#[cfg(test)]
pub(crate) use vocab::fake;
