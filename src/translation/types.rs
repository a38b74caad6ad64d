//! 翻译请求与结果类型

use serde::{Deserialize, Serialize};

use crate::translation::config::{constants, is_supported_language};
use crate::translation::error::{ProviderError, ServiceResult, TranslationError};

fn default_source_lang() -> String {
    constants::AUTO_SOURCE_LANG.to_string()
}

/// 单次翻译请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    /// 语言代码或 `"auto"`
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// 校验请求
    ///
    /// 文本去空白后不能为空且不超过 `max_text_length` 个字符，目标语言必须在支持列表中，
    /// 源语言为 `auto` 或支持的语言代码。
    pub fn validate(&self, max_text_length: usize) -> ServiceResult<()> {
        if self.text.trim().is_empty() {
            return Err(TranslationError::InvalidInput(
                "text: 文本不能为空".to_string(),
            ));
        }

        let length = self.text.chars().count();
        if length > max_text_length {
            return Err(TranslationError::InvalidInput(format!(
                "text: 文本过长 ({} > {} 字符)",
                length, max_text_length
            )));
        }

        if !is_supported_language(&self.target_lang) {
            return Err(TranslationError::InvalidInput(format!(
                "targetLang: 不支持的目标语言 '{}'",
                self.target_lang
            )));
        }

        if self.source_lang != constants::AUTO_SOURCE_LANG
            && !is_supported_language(&self.source_lang)
        {
            return Err(TranslationError::InvalidInput(format!(
                "sourceLang: 不支持的源语言 '{}'",
                self.source_lang
            )));
        }

        Ok(())
    }

    /// 生成缓存键
    ///
    /// 文本转小写后与源、目标语言拼接，再取 blake3 摘要，保证键长固定。
    pub fn cache_key(&self) -> String {
        let normalized = format!(
            "{}::{}::{}",
            self.text.to_lowercase(),
            self.source_lang,
            self.target_lang
        );
        blake3::hash(normalized.as_bytes()).to_hex().to_string()
    }

    /// 全部提供方失败时的占位译文：`原文 (目标语言大写)`
    pub fn placeholder_text(&self) -> String {
        format!("{} ({})", self.text, self.target_lang.to_uppercase())
    }
}

/// 结果来源层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    /// 提供方链中的第一个
    Primary,
    /// 提供方链中靠后的某一个
    Secondary,
    /// 全部失败后合成的占位译文
    Fallback,
}

impl ProviderTag {
    /// 根据提供方在链中的位置确定层级
    pub fn for_position(index: usize) -> Self {
        if index == 0 {
            ProviderTag::Primary
        } else {
            ProviderTag::Secondary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::Primary => "primary",
            ProviderTag::Secondary => "secondary",
            ProviderTag::Fallback => "fallback",
        }
    }
}

/// 一次翻译的结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub provider: ProviderTag,
    pub word_count: usize,
    /// 产生译文的适配器名称，占位结果为 `placeholder`
    pub engine: String,
}

impl TranslationResult {
    /// 合成占位结果
    pub fn placeholder(request: &TranslationRequest) -> Self {
        Self {
            translated_text: request.placeholder_text(),
            provider: ProviderTag::Fallback,
            word_count: count_words(&request.text),
            engine: constants::PLACEHOLDER_ENGINE.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.provider == ProviderTag::Fallback
    }
}

/// 单个适配器的失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterFailure {
    pub adapter: String,
    pub error: ProviderError,
}

/// 编排器对一次请求的处理结果
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: TranslationResult,
    /// 结果来自缓存，本次没有调用任何提供方
    pub cache_hit: bool,
    /// 本次按顺序尝试失败的适配器，缓存命中时为空
    pub failures: Vec<AdapterFailure>,
    rate_limited: bool,
}

impl Resolution {
    /// 走完提供方链得到的结果
    pub fn resolved(result: TranslationResult, failures: Vec<AdapterFailure>) -> Self {
        let rate_limited =
            result.is_placeholder() && failures.iter().any(|f| f.error.is_rate_limited());
        Self {
            result,
            cache_hit: false,
            failures,
            rate_limited,
        }
    }

    /// 缓存命中，沿用写入时的限流状态
    pub fn cached(result: TranslationResult, rate_limited: bool) -> Self {
        Self {
            result,
            cache_hit: true,
            failures: Vec::new(),
            rate_limited,
        }
    }

    /// 返回占位译文且至少一个提供方因限流失败
    ///
    /// HTTP 层据此返回 429，让客户端稍后重试。
    pub fn rate_limited(&self) -> bool {
        self.rate_limited
    }
}

/// 统计空白分隔的词数，连续空白视为一个分隔
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
