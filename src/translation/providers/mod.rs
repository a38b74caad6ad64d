//! 翻译提供方适配器
//!
//! 每个适配器把统一的翻译调用映射到一个远端服务，失败时只返回
//! [`ProviderError::RateLimited`] 或 [`ProviderError::Unavailable`]。
//! 编排器按配置顺序依次尝试，见 [`build_chain`]。

pub mod gemini;
pub mod libre;
pub mod mymemory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use gemini::GeminiProvider;
pub use libre::LibreTranslateProvider;
pub use mymemory::MyMemoryProvider;

use crate::translation::config::TranslationConfig;
use crate::translation::error::{ProviderError, ServiceResult, TranslationError};

/// 翻译提供方
///
/// 实现必须可在多个请求间共享，除 HTTP 客户端外不持有可变状态。
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 适配器名称，写入结果的 `engine` 字段
    fn name(&self) -> &str;

    /// 单次调用的时间上限，由编排器强制执行
    fn timeout(&self) -> Duration;

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError>;
}

/// 内置提供方类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    LibreTranslate,
    MyMemory,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::LibreTranslate => "libretranslate",
            ProviderKind::MyMemory => "mymemory",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "libretranslate" | "libre" => Ok(ProviderKind::LibreTranslate),
            "mymemory" => Ok(ProviderKind::MyMemory),
            other => Err(TranslationError::ConfigError(format!(
                "未知的翻译提供方 '{}'",
                other
            ))),
        }
    }
}

/// 按配置顺序构建提供方链
///
/// 未配置 API 密钥的 Gemini 会被跳过，重复出现的提供方只保留第一次。
pub fn build_chain(config: &TranslationConfig) -> ServiceResult<Vec<Arc<dyn TranslationProvider>>> {
    let mut chain: Vec<Arc<dyn TranslationProvider>> = Vec::with_capacity(config.providers.len());
    let mut seen = Vec::with_capacity(config.providers.len());

    for kind in &config.providers {
        if seen.contains(kind) {
            tracing::warn!("提供方 {} 重复配置，已忽略", kind);
            continue;
        }
        seen.push(*kind);

        match kind {
            ProviderKind::Gemini => match GeminiProvider::new(&config.gemini)? {
                Some(provider) => chain.push(Arc::new(provider)),
                None => tracing::info!("未配置 GEMINI_API_KEY，跳过 Gemini 提供方"),
            },
            ProviderKind::LibreTranslate => {
                chain.push(Arc::new(LibreTranslateProvider::new(&config.libretranslate)?))
            }
            ProviderKind::MyMemory => {
                chain.push(Arc::new(MyMemoryProvider::new(&config.mymemory)?))
            }
        }
    }

    tracing::info!(
        "提供方链: [{}]",
        chain
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(chain)
}

/// 构建带超时的 HTTP 客户端
pub(crate) fn http_client(timeout: Duration) -> ServiceResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("translink/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| TranslationError::ConfigError(format!("HTTP客户端创建失败: {}", e)))
}
