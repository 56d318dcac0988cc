//! 模型登记表与推理接口
//!
//! 每个任务的可用模型是一个封闭枚举，按名称（大小写不敏感）解析，并给出
//! 对应的 Hub 资源名。数值推理通过 [`InferenceSession`] 接入。

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hub::Hub;
use crate::preprocessing::StopWordFilter;
use crate::tokenization::{ChunkedTokenizer, SubwordVocab};
use crate::transform::{for_each_text, Batch, TextTransform, Transform, Value};

macro_rules! model_registry {
    (
        $(#[$meta:meta])*
        $name:ident, $task:literal {
            $($variant:ident => $key:literal, $resource:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant,)+
        }

        impl $name {
            pub const NAMES: &'static [&'static str] = &[$($key),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            /// Hub 资源名
            pub fn resource_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $resource,)+
                }
            }

            /// 通过 Hub 获取模型文件
            pub fn locate(&self, hub: &Hub) -> Result<PathBuf> {
                hub.get_resource(self.resource_name())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_lowercase().as_str() {
                    $($key => Ok($name::$variant),)+
                    _ => Err(Error::UnknownModel {
                        task: $task,
                        name: s.to_string(),
                        available: Self::NAMES,
                    }),
                }
            }
        }
    };
}

model_registry!(
    /// 命名实体识别模型
    NerModel, "NER" {
        Albert => "albert", "albert_persian_ner_q8.onnx";
    }
);

model_registry!(
    /// 拼写检查模型
    SpellCheckerModel, "spell checking" {
        Statistical => "statistical", "statistical_spell_checker.json";
    }
);

model_registry!(
    /// 冒犯性语言分类模型
    OffensiveModel, "offensive language" {
        LogisticOffensive => "logistic_offensive", "tfidf_logistic_offensive.onnx";
    }
);

model_registry!(
    /// 句向量模型
    EmbeddingModel, "sentence embedding" {
        Albert => "albert", "albert_persian_embedding_q8.onnx";
    }
);

/// 行优先的 f32 张量
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::Inference(format!(
                "张量形状 {:?} 与数据长度 {} 不匹配",
                shape,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// 推理会话输入
#[derive(Debug, Clone, Copy)]
pub enum SessionInput<'a> {
    Text(&'a str),
    Batch(&'a Batch),
}

/// 同步数值推理会话
pub trait InferenceSession: Send + Sync {
    fn run(&self, input: SessionInput<'_>) -> Result<Tensor>;
}

/// 冒犯性语言分类
///
/// 先去停用词，再送入会话；会话返回 `[1, 2]` 概率，取最大者。
#[derive(Clone)]
pub struct OffensiveLanguageClassifier {
    model: OffensiveModel,
    session: Arc<dyn InferenceSession>,
    stopwords: StopWordFilter,
}

const OFFENSIVE_LABELS: [&str; 2] = ["neutral", "offensive"];

impl OffensiveLanguageClassifier {
    pub fn new(model: OffensiveModel, session: Arc<dyn InferenceSession>) -> Result<Self> {
        tracing::debug!("OffensiveLanguageClassifier: {}", model.name());
        Ok(Self {
            model,
            session,
            stopwords: StopWordFilter::new()?,
        })
    }

    pub fn model(&self) -> OffensiveModel {
        self.model
    }

    /// 返回 `(标签, 概率)`
    pub fn classify(&self, text: &str) -> Result<(String, f32)> {
        let filtered = self.stopwords.transform_text(text);
        let proba = self.session.run(SessionInput::Text(&filtered))?;
        if proba.data.len() != OFFENSIVE_LABELS.len() {
            return Err(Error::Inference(format!(
                "期望 {} 个类别概率，实际 {}",
                OFFENSIVE_LABELS.len(),
                proba.data.len()
            )));
        }

        let (index, score) = proba
            .data
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, p)| if p > best.1 { (i, p) } else { best });
        Ok((OFFENSIVE_LABELS[index].to_string(), score))
    }
}

impl Transform for OffensiveLanguageClassifier {
    fn transform(&self, x: Value) -> Result<Value> {
        let this = self.clone();
        for_each_text(x, move |text| {
            let (label, score) = this.classify(&text)?;
            Ok(Value::Label { label, score })
        })
    }
}

impl std::fmt::Debug for OffensiveLanguageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffensiveLanguageClassifier")
            .field("model", &self.model)
            .finish()
    }
}

/// 句向量
///
/// 分块分词 → 会话输出 `[块数, 序列长度, 维度]` 的隐藏状态 → 按 attention mask
/// 对所有块的有效 token 求均值。
pub struct SentenceEmbedder<V: SubwordVocab> {
    model: EmbeddingModel,
    tokenizer: ChunkedTokenizer<V>,
    session: Arc<dyn InferenceSession>,
}

impl<V: SubwordVocab> Clone for SentenceEmbedder<V> {
    fn clone(&self) -> Self {
        Self {
            model: self.model,
            tokenizer: self.tokenizer.clone(),
            session: Arc::clone(&self.session),
        }
    }
}

impl<V: SubwordVocab> SentenceEmbedder<V> {
    pub fn new(
        model: EmbeddingModel,
        tokenizer: ChunkedTokenizer<V>,
        session: Arc<dyn InferenceSession>,
    ) -> Self {
        tracing::debug!("SentenceEmbedder: {}", model.name());
        Self {
            model,
            tokenizer,
            session,
        }
    }

    pub fn model(&self) -> EmbeddingModel {
        self.model
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let batch = self.tokenizer.tokenize(text)?;
        let hidden = self.session.run(SessionInput::Batch(&batch))?;
        mean_pool(&hidden, &batch.attention_mask)
    }
}

fn mean_pool(hidden: &Tensor, masks: &[Vec<i64>]) -> Result<Vec<f32>> {
    let [chunks, seq_len, dim] = match hidden.shape.as_slice() {
        &[c, s, d] => [c, s, d],
        other => {
            return Err(Error::Inference(format!(
                "隐藏状态应为三维，实际形状 {:?}",
                other
            )))
        }
    };
    if chunks != masks.len() {
        return Err(Error::Inference(format!(
            "隐藏状态块数 {} 与批次 {} 不一致",
            chunks,
            masks.len()
        )));
    }
    if hidden.data.len() != chunks * seq_len * dim {
        return Err(Error::Inference(format!(
            "隐藏状态数据长度 {} 与形状 {:?} 不一致",
            hidden.data.len(),
            hidden.shape
        )));
    }

    let mut sum = vec![0.0f32; dim];
    let mut count = 0usize;
    for (c, mask) in masks.iter().enumerate() {
        for (t, &m) in mask.iter().take(seq_len).enumerate() {
            if m == 0 {
                continue;
            }
            let offset = (c * seq_len + t) * dim;
            for (acc, v) in sum.iter_mut().zip(&hidden.data[offset..offset + dim]) {
                *acc += v;
            }
            count += 1;
        }
    }

    if count > 0 {
        for v in sum.iter_mut() {
            *v /= count as f32;
        }
    }
    Ok(sum)
}

impl<V: SubwordVocab + 'static> Transform for SentenceEmbedder<V> {
    fn transform(&self, x: Value) -> Result<Value> {
        let this = self.clone();
        for_each_text(x, move |text| Ok(Value::Vector(this.embed(&text)?)))
    }
}
