//! Gemini 生成式翻译适配器

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{http_client, TranslationProvider};
use crate::translation::config::{constants, language_name, GeminiConfig};
use crate::translation::error::{ProviderError, ServiceResult};

/// 配额耗尽时 Google API 错误体中的状态
const RESOURCE_EXHAUSTED: &str = "RESOURCE_EXHAUSTED";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

/// Gemini 提供方
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl GeminiProvider {
    /// 创建提供方，未配置 API 密钥时返回 `None`
    pub fn new(config: &GeminiConfig) -> ServiceResult<Option<Self>> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Ok(None),
        };

        let timeout = config.timeout();
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Some(Self {
            client: http_client(timeout)?,
            api_key,
            endpoint,
            timeout,
        }))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::classify_envelope(status, envelope.error),
            Err(_) => ProviderError::from_status(status, body.chars().take(200).collect::<String>()),
        }
    }

    fn classify_envelope(status: reqwest::StatusCode, error: ApiError) -> ProviderError {
        if error.status == RESOURCE_EXHAUSTED {
            ProviderError::RateLimited(error.message)
        } else if status.is_success() {
            ProviderError::Unavailable(format!("{}: {}", error.status, error.message))
        } else {
            ProviderError::from_status(status, error.message)
        }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::Unavailable(
                "Gemini 响应中没有译文".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// 构建翻译指令，源语言为 `auto` 时省略
pub fn build_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    let target = language_name(target_lang).unwrap_or(target_lang);
    if source_lang == constants::AUTO_SOURCE_LANG {
        format!(
            "Translate \"{}\" to {}. Return ONLY the translated text.",
            text, target
        )
    } else {
        let source = language_name(source_lang).unwrap_or(source_lang);
        format!(
            "Translate \"{}\" from {} to {}. Return ONLY the translated text.",
            text, source, target
        )
    }
}

#[async_trait]
impl TranslationProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let prompt = build_prompt(text, source_lang, target_lang);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(Self::classify_error(status, &payload));
        }

        // 成功状态下也可能返回错误体
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&payload) {
            return Err(Self::classify_envelope(status, envelope.error));
        }

        let parsed: GenerateResponse = serde_json::from_str(&payload)?;
        Self::extract_text(parsed)
    }
}
