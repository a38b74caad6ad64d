//! LibreTranslate 适配器

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{http_client, TranslationProvider};
use crate::translation::config::LibreTranslateConfig;
use crate::translation::error::{ProviderError, ServiceResult};

#[derive(Debug, Serialize)]
struct LibreRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: Option<String>,
}

pub struct LibreTranslateProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl LibreTranslateProvider {
    pub fn new(config: &LibreTranslateConfig) -> ServiceResult<Self> {
        let timeout = config.timeout();
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/translate", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            timeout,
        })
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "libretranslate"
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
        let body = LibreRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(
                status,
                detail.chars().take(200).collect::<String>(),
            ));
        }

        let parsed: LibreResponse = response.json().await?;
        match parsed.translated_text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::Unavailable(
                "LibreTranslate 响应缺少 translatedText".to_string(),
            )),
        }
    }
}
