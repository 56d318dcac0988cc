//! 掩码器：把邮箱、URL 替换为占位符

use crate::error::Result;
use crate::transform::{compile_patterns, Replacement, RuleSet, TextTransform};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+";
const URL_PATTERN: &str = r"(?:https?://|www\.)[^\s]+";

fn masker_rules(pattern: &str, mask: &str) -> Result<RuleSet> {
    compile_patterns([(pattern, Replacement::literal(mask))])
}

/// 邮箱掩码，默认占位符 `<EMAIL>`
#[derive(Debug, Clone)]
pub struct EmailMasker {
    rules: RuleSet,
}

impl EmailMasker {
    pub fn new() -> Result<Self> {
        Self::with_mask("<EMAIL>")
    }

    pub fn with_mask(mask: &str) -> Result<Self> {
        Ok(Self {
            rules: masker_rules(EMAIL_PATTERN, mask)?,
        })
    }
}

impl TextTransform for EmailMasker {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text).trim().to_string()
    }
}

/// URL 掩码，默认占位符 `<URL>`
#[derive(Debug, Clone)]
pub struct URLMasker {
    rules: RuleSet,
}

impl URLMasker {
    pub fn new() -> Result<Self> {
        Self::with_mask("<URL>")
    }

    pub fn with_mask(mask: &str) -> Result<Self> {
        Ok(Self {
            rules: masker_rules(URL_PATTERN, mask)?,
        })
    }
}

impl TextTransform for URLMasker {
    fn transform_text(&self, text: &str) -> String {
        self.rules.apply(text).trim().to_string()
    }
}
