//! MyMemory 适配器
//!
//! 免费接口，不需要密钥。`de` 参数填邮箱可以提高每日额度。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{http_client, TranslationProvider};
use crate::translation::config::{constants, MyMemoryConfig};
use crate::translation::error::{ProviderError, ServiceResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    response_status: Option<serde_json::Value>,
    response_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    /// `responseStatus` 有时是数字，有时是字符串
    fn status_code(&self) -> Option<u16> {
        match self.response_status.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn details(&self) -> String {
        match &self.response_details {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

pub struct MyMemoryProvider {
    client: reqwest::Client,
    endpoint: String,
    email: Option<String>,
    timeout: Duration,
}

impl MyMemoryProvider {
    pub fn new(config: &MyMemoryConfig) -> ServiceResult<Self> {
        let timeout = config.timeout();
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/get", config.url.trim_end_matches('/')),
            email: config.email.clone().filter(|e| !e.is_empty()),
            timeout,
        })
    }

    fn lang_pair(source_lang: &str, target_lang: &str) -> String {
        let source = if source_lang == constants::AUTO_SOURCE_LANG {
            "Autodetect"
        } else {
            source_lang
        };
        format!("{}|{}", source, target_lang)
    }

    fn interpret(response: MyMemoryResponse) -> Result<String, ProviderError> {
        match response.status_code() {
            Some(200) => {}
            Some(429) => return Err(ProviderError::RateLimited(response.details())),
            Some(code) => {
                return Err(ProviderError::Unavailable(format!(
                    "MyMemory 状态 {}: {}",
                    code,
                    response.details()
                )))
            }
            None => {
                return Err(ProviderError::Unavailable(
                    "MyMemory 响应缺少 responseStatus".to_string(),
                ))
            }
        }

        match response.response_data.and_then(|d| d.translated_text) {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::Unavailable(
                "MyMemory 响应缺少 translatedText".to_string(),
            )),
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
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
        let langpair = Self::lang_pair(source_lang, target_lang);
        let mut query = vec![("q", text), ("langpair", langpair.as_str())];
        if let Some(email) = self.email.as_deref() {
            query.push(("de", email));
        }

        let response = self.client.get(&self.endpoint).query(&query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(status, "MyMemory 请求失败"));
        }

        let parsed: MyMemoryResponse = response.json().await?;
        Self::interpret(parsed)
    }
}
