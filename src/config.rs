use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hub::DEFAULT_BASE_URL;
use crate::normalizer::Normalizer;
use crate::pipeline::Step;
use crate::preprocessing::{
    AlphabetNormalizer, ArabicUnicodeNormalizer, DiacriticFilter, DigitFilter, DigitNormalizer,
    EmailMasker, EmojiFilter, HTMLTagFilter, HashtagFilter, MentionFilter, NonPersianLetterFilter,
    PunctuationFilter, PunctuationNormalizer, PunctuationSpacingStandardizer,
    RepeatedLetterFilter, SpacingStandardizer, StopWordFilter, URLMasker,
};
use crate::tokenization::{SentenceTokenizer, WordTokenizer};
use crate::transform::Transform;
use crate::transforms::{Flatten, NGramExtractor};

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub tokenizer: ChunkedTokenizerConfig,
}

/// 资源中心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// 缓存目录；为空时使用 `~/.shekar`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 资源名 → SHA-256
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            base_url: default_base_url(),
            resources: BTreeMap::new(),
        }
    }
}

impl HubConfig {
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".shekar"))
                .ok_or_else(|| Error::invalid_config("无法获取用户主目录")),
        }
    }
}

/// 规范化器配置；`steps` 为空时使用默认步骤
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepConfig>>,
}

impl NormalizerConfig {
    pub fn build(&self) -> Result<Normalizer> {
        match &self.steps {
            None => Normalizer::new(),
            Some(steps) => {
                let steps = steps
                    .iter()
                    .map(|step| Ok((step.name().to_string(), step.build()?)))
                    .collect::<Result<Vec<Step>>>()?;
                Ok(Normalizer::from_steps(steps))
            }
        }
    }
}

/// 管道步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    AlphabetNormalizer,
    ArabicUnicodeNormalizer,
    DigitNormalizer,
    PunctuationNormalizer,
    SpacingStandardizer,
    PunctuationSpacingStandardizer,
    EmojiFilter,
    DiacriticFilter,
    RepeatedLetterFilter,
    PunctuationFilter,
    #[serde(rename = "html_tag_filter")]
    HTMLTagFilter {
        #[serde(default)]
        replace_with: Option<String>,
    },
    MentionFilter {
        #[serde(default)]
        replace_with: Option<String>,
    },
    HashtagFilter {
        #[serde(default)]
        replace_with: Option<String>,
    },
    DigitFilter {
        #[serde(default)]
        replace_with: Option<String>,
    },
    StopWordFilter {
        #[serde(default)]
        replace_with: Option<String>,
    },
    NonPersianLetterFilter {
        #[serde(default)]
        keep_english: bool,
        #[serde(default)]
        keep_diacritics: bool,
        #[serde(default)]
        replace_with: String,
    },
    EmailMasker {
        #[serde(default)]
        mask: Option<String>,
    },
    #[serde(rename = "url_masker")]
    URLMasker {
        #[serde(default)]
        mask: Option<String>,
    },
    WordTokenizer,
    SentenceTokenizer,
    #[serde(rename = "ngram_extractor")]
    NGramExtractor { min: usize, max: usize },
    Flatten,
}

impl StepConfig {
    /// 管道中的阶段名
    pub fn name(&self) -> &'static str {
        match self {
            StepConfig::AlphabetNormalizer => "AlphabetNormalizer",
            StepConfig::ArabicUnicodeNormalizer => "ArabicUnicodeNormalizer",
            StepConfig::DigitNormalizer => "DigitNormalizer",
            StepConfig::PunctuationNormalizer => "PunctuationNormalizer",
            StepConfig::SpacingStandardizer => "SpacingStandardizer",
            StepConfig::PunctuationSpacingStandardizer => "PunctuationSpacingStandardizer",
            StepConfig::EmojiFilter => "EmojiFilter",
            StepConfig::DiacriticFilter => "DiacriticFilter",
            StepConfig::RepeatedLetterFilter => "RepeatedLetterFilter",
            StepConfig::PunctuationFilter => "PunctuationFilter",
            StepConfig::HTMLTagFilter { .. } => "HTMLTagFilter",
            StepConfig::MentionFilter { .. } => "MentionFilter",
            StepConfig::HashtagFilter { .. } => "HashtagFilter",
            StepConfig::DigitFilter { .. } => "DigitFilter",
            StepConfig::StopWordFilter { .. } => "StopWordFilter",
            StepConfig::NonPersianLetterFilter { .. } => "NonPersianLetterFilter",
            StepConfig::EmailMasker { .. } => "EmailMasker",
            StepConfig::URLMasker { .. } => "URLMasker",
            StepConfig::WordTokenizer => "WordTokenizer",
            StepConfig::SentenceTokenizer => "SentenceTokenizer",
            StepConfig::NGramExtractor { .. } => "NGramExtractor",
            StepConfig::Flatten => "Flatten",
        }
    }

    pub fn build(&self) -> Result<Box<dyn Transform>> {
        Ok(match self {
            StepConfig::AlphabetNormalizer => Box::new(AlphabetNormalizer::new()?),
            StepConfig::ArabicUnicodeNormalizer => Box::new(ArabicUnicodeNormalizer::new()?),
            StepConfig::DigitNormalizer => Box::new(DigitNormalizer::new()?),
            StepConfig::PunctuationNormalizer => Box::new(PunctuationNormalizer::new()?),
            StepConfig::SpacingStandardizer => Box::new(SpacingStandardizer::new()?),
            StepConfig::PunctuationSpacingStandardizer => {
                Box::new(PunctuationSpacingStandardizer::new()?)
            }
            StepConfig::EmojiFilter => Box::new(EmojiFilter::new()?),
            StepConfig::DiacriticFilter => Box::new(DiacriticFilter::new()?),
            StepConfig::RepeatedLetterFilter => Box::new(RepeatedLetterFilter::new()?),
            StepConfig::PunctuationFilter => Box::new(PunctuationFilter::new()?),
            StepConfig::HTMLTagFilter { replace_with } => Box::new(match replace_with {
                Some(r) => HTMLTagFilter::with_replacement(r)?,
                None => HTMLTagFilter::new()?,
            }),
            StepConfig::MentionFilter { replace_with } => Box::new(match replace_with {
                Some(r) => MentionFilter::with_replacement(r)?,
                None => MentionFilter::new()?,
            }),
            StepConfig::HashtagFilter { replace_with } => Box::new(match replace_with {
                Some(r) => HashtagFilter::with_replacement(r)?,
                None => HashtagFilter::new()?,
            }),
            StepConfig::DigitFilter { replace_with } => Box::new(match replace_with {
                Some(r) => DigitFilter::with_replacement(r)?,
                None => DigitFilter::new()?,
            }),
            StepConfig::StopWordFilter { replace_with } => Box::new(match replace_with {
                Some(r) => StopWordFilter::with_replacement(r)?,
                None => StopWordFilter::new()?,
            }),
            StepConfig::NonPersianLetterFilter {
                keep_english,
                keep_diacritics,
                replace_with,
            } => Box::new(NonPersianLetterFilter::with_options(
                *keep_english,
                *keep_diacritics,
                replace_with,
            )?),
            StepConfig::EmailMasker { mask } => Box::new(match mask {
                Some(m) => EmailMasker::with_mask(m)?,
                None => EmailMasker::new()?,
            }),
            StepConfig::URLMasker { mask } => Box::new(match mask {
                Some(m) => URLMasker::with_mask(m)?,
                None => URLMasker::new()?,
            }),
            StepConfig::WordTokenizer => Box::new(WordTokenizer::new()),
            StepConfig::SentenceTokenizer => Box::new(SentenceTokenizer::new()?),
            StepConfig::NGramExtractor { min, max } => Box::new(NGramExtractor::new(*min, *max)?),
            StepConfig::Flatten => Box::new(Flatten),
        })
    }
}

/// 分块分词器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedTokenizerConfig {
    #[serde(default = "default_model_max_length")]
    pub model_max_length: usize,
    #[serde(default)]
    pub stride: usize,
    #[serde(default)]
    pub enable_padding: bool,
    #[serde(default)]
    pub enable_truncation: bool,
}

fn default_model_max_length() -> usize {
    512
}

impl Default for ChunkedTokenizerConfig {
    fn default() -> Self {
        Self {
            model_max_length: default_model_max_length(),
            stride: 0,
            enable_padding: false,
            enable_truncation: false,
        }
    }
}

impl ChunkedTokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.model_max_length < 3 {
            return Err(Error::invalid_config(format!(
                "model_max_length 至少为 3，当前 {}",
                self.model_max_length
            )));
        }
        let max_body_len = self.model_max_length - 2;
        if self.stride >= max_body_len {
            return Err(Error::invalid_config(format!(
                "stride ({}) 必须小于 model_max_length - 2 ({})",
                self.stride, max_body_len
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| Error::invalid_config("无法获取配置目录"))?;
        Ok(config_dir.join("Shekar").join("config.json"))
    }

    /// 从默认路径加载；文件不存在时返回默认配置
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("配置文件不存在，使用默认配置: {:?}", path);
            return Ok(Self::default());
        }

        tracing::info!("从以下路径加载配置: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tokenizer.validate()
    }

    /// 原子写入：先写临时文件，再替换
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");

        std::fs::write(&temp_path, &content)?;
        if let Err(err) = std::fs::rename(&temp_path, path) {
            tracing::error!("替换配置文件失败: {}", err);
            if let Err(cleanup_err) = std::fs::remove_file(&temp_path) {
                tracing::warn!("清理临时文件失败: {}", cleanup_err);
            }
            return Err(err.into());
        }
        tracing::info!("保存配置到: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_points_to_shekar_dir() {
        if let Ok(path) = AppConfig::config_path() {
            let path_str = path.to_string_lossy().to_lowercase();
            assert!(path_str.contains("shekar"));
            assert!(path_str.ends_with("config.json"));
        }
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let config = AppConfig::load_from(&temp.path().join("config.json")).unwrap();

        assert!(config.normalizer.steps.is_none());
        assert_eq!(config.tokenizer, ChunkedTokenizerConfig::default());
        assert_eq!(config.tokenizer.model_max_length, 512);
        assert_eq!(config.hub.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_default_cache_dir_is_dot_shekar() {
        let hub = HubConfig::default();
        if let Ok(dir) = hub.resolved_cache_dir() {
            assert!(dir.ends_with(".shekar"));
        }

        let explicit = HubConfig {
            cache_dir: Some(PathBuf::from("/tmp/models")),
            ..Default::default()
        };
        assert_eq!(explicit.resolved_cache_dir().unwrap(), PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_load_custom_steps_and_build() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r##"{
                "normalizer": {
                    "steps": [
                        { "type": "digit_normalizer" },
                        { "type": "digit_filter", "replace_with": "#" },
                        { "type": "spacing_standardizer" }
                    ]
                },
                "tokenizer": { "model_max_length": 128, "enable_truncation": true }
            }"##,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.tokenizer.model_max_length, 128);
        assert!(config.tokenizer.enable_truncation);
        assert_eq!(config.tokenizer.stride, 0);

        let normalizer = config.normalizer.build().unwrap();
        assert_eq!(
            normalizer.pipeline().names().collect::<Vec<_>>(),
            vec!["DigitNormalizer", "DigitFilter", "SpacingStandardizer"]
        );
        assert_eq!(normalizer.normalize("کد  12").unwrap(), "کد ##");
    }

    #[test]
    fn test_step_tags() {
        let steps: Vec<StepConfig> = serde_json::from_str(
            r#"[
                { "type": "html_tag_filter" },
                { "type": "url_masker", "mask": "" },
                { "type": "ngram_extractor", "min": 1, "max": 2 },
                { "type": "non_persian_letter_filter", "keep_english": true }
            ]"#,
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                StepConfig::HTMLTagFilter { replace_with: None },
                StepConfig::URLMasker {
                    mask: Some(String::new())
                },
                StepConfig::NGramExtractor { min: 1, max: 2 },
                StepConfig::NonPersianLetterFilter {
                    keep_english: true,
                    keep_diacritics: false,
                    replace_with: String::new(),
                },
            ]
        );
        assert!(steps.iter().all(|step| step.build().is_ok()));
    }

    #[test]
    fn test_unknown_step_type_fails() {
        let result: std::result::Result<StepConfig, _> =
            serde_json::from_str(r#"{ "type": "stemmer" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_ngram_step_fails_to_build() {
        let step = StepConfig::NGramExtractor { min: 3, max: 1 };
        assert!(matches!(step.build(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_tokenizer_config_validation() {
        assert!(ChunkedTokenizerConfig::default().validate().is_ok());

        let too_short = ChunkedTokenizerConfig {
            model_max_length: 2,
            ..Default::default()
        };
        assert!(too_short.validate().is_err());

        let stalled = ChunkedTokenizerConfig {
            model_max_length: 10,
            stride: 8,
            ..Default::default()
        };
        assert!(stalled.validate().is_err());
    }

    #[test]
    fn test_invalid_tokenizer_config_rejected_on_load() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "tokenizer": { "model_max_length": 2 } }"#).unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.normalizer.steps = Some(vec![StepConfig::AlphabetNormalizer, StepConfig::Flatten]);
        config.hub.resources.insert("a.onnx".to_string(), "abc".to_string());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.normalizer.steps, config.normalizer.steps);
        assert_eq!(loaded.hub.resources.get("a.onnx").map(String::as_str), Some("abc"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
