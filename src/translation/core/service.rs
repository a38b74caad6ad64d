//! 翻译服务核心实现
//!
//! [`TranslationService`] 是回退编排器：先查缓存，未命中时按顺序尝试提供方链，
//! 全部失败则合成占位译文。`resolve` 永远不会返回错误，提供方的失败记录在
//! [`Resolution::failures`] 中，由调用方决定如何响应（例如 HTTP 429）。
//!
//! ## 使用示例
//!
//! ```no_run
//! use translink::translation::{TranslationRequest, TranslationService};
//!
//! # async fn demo() -> translink::translation::ServiceResult<()> {
//! let service = TranslationService::create_default()?;
//! let request = TranslationRequest::new("Hello", "en", "fr");
//! service.validate(&request)?;
//!
//! let resolution = service.resolve(&request).await;
//! println!("{} ({:?})", resolution.result.translated_text, resolution.result.provider);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::stats::{ServiceStats, StatsSnapshot};
use crate::translation::{
    config::{load_translation_config, TranslationConfig},
    error::{ProviderError, ServiceResult, TranslationError},
    providers::{build_chain, TranslationProvider},
    storage::ResultCache,
    types::{
        count_words, AdapterFailure, ProviderTag, Resolution, TranslationRequest,
        TranslationResult,
    },
};

/// 翻译回退编排器
///
/// 持有提供方链、结果缓存和统计计数器。所有字段都可以跨线程共享，
/// 在 Web 层通过 `Arc<TranslationService>` 注入。
pub struct TranslationService {
    providers: Vec<Arc<dyn TranslationProvider>>,
    /// 缓存关闭时为 `None`
    cache: Option<ResultCache>,
    stats: ServiceStats,
    max_text_length: usize,
    max_batch_size: usize,
}

impl TranslationService {
    /// 根据配置创建服务，提供方链由 [`build_chain`] 构建
    pub fn new(config: TranslationConfig) -> ServiceResult<Self> {
        config.validate()?;
        let providers = build_chain(&config)?;
        Ok(Self::with_providers(providers, &config))
    }

    /// 使用显式给定的提供方链创建服务
    pub fn with_providers(
        providers: Vec<Arc<dyn TranslationProvider>>,
        config: &TranslationConfig,
    ) -> Self {
        let cache = config
            .cache_enabled
            .then(|| ResultCache::new(config.cache_ttl()));

        if providers.is_empty() {
            tracing::warn!("提供方链为空，所有请求都将返回占位译文");
        }

        Self {
            providers,
            cache,
            stats: ServiceStats::new(),
            max_text_length: config.max_text_length,
            max_batch_size: config.max_batch_size,
        }
    }

    /// 从默认配置来源（`.env`、配置文件、环境变量）创建服务
    pub fn create_default() -> ServiceResult<Self> {
        Self::new(load_translation_config())
    }

    /// 校验请求
    pub fn validate(&self, request: &TranslationRequest) -> ServiceResult<()> {
        request.validate(self.max_text_length)
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// 解析一次翻译请求，永不失败
    ///
    /// 调用前应先通过 [`validate`](Self::validate) 校验。
    pub async fn resolve(&self, request: &TranslationRequest) -> Resolution {
        let key = request.cache_key();

        if let Some(cache) = &self.cache {
            if let Some(entry) = cache.get(&key) {
                tracing::debug!("缓存命中: {} -> {}", request.source_lang, request.target_lang);
                self.stats.record_cache_hit();
                return Resolution::cached(entry.result, entry.rate_limited);
            }
            self.stats.record_cache_miss();
        }

        let (result, failures) = self.run_chain(request).await;
        self.stats.record_translation(&result);
        let resolution = Resolution::resolved(result, failures);

        if let Some(cache) = &self.cache {
            cache.set(key, resolution.result.clone(), resolution.rate_limited());
        }

        resolution
    }

    /// 按顺序依次解析一批请求
    ///
    /// 超过批量上限时返回 `InvalidInput`，不会调用任何提供方。
    pub async fn resolve_batch(
        &self,
        requests: &[TranslationRequest],
    ) -> ServiceResult<Vec<Resolution>> {
        if requests.len() > self.max_batch_size {
            return Err(TranslationError::InvalidInput(format!(
                "translations: 批量请求最多 {} 条，实际 {} 条",
                self.max_batch_size,
                requests.len()
            )));
        }

        let mut resolutions = Vec::with_capacity(requests.len());
        for request in requests {
            resolutions.push(self.resolve(request).await);
        }
        Ok(resolutions)
    }

    async fn run_chain(
        &self,
        request: &TranslationRequest,
    ) -> (TranslationResult, Vec<AdapterFailure>) {
        let mut failures = Vec::new();

        for (index, provider) in self.providers.iter().enumerate() {
            match self.call_provider(provider.as_ref(), request).await {
                Ok(translated_text) => {
                    tracing::info!(
                        "翻译完成: engine={} {} -> {}",
                        provider.name(),
                        request.source_lang,
                        request.target_lang
                    );
                    let result = TranslationResult {
                        translated_text,
                        provider: ProviderTag::for_position(index),
                        word_count: count_words(&request.text),
                        engine: provider.name().to_string(),
                    };
                    return (result, failures);
                }
                Err(error) => {
                    tracing::warn!("提供方 {} 失败 ({}): {}", provider.name(), error.reason(), error);
                    self.stats.record_failure(&error);
                    failures.push(AdapterFailure {
                        adapter: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        tracing::error!(
            "所有提供方均失败 ({} 个)，返回占位译文",
            self.providers.len()
        );
        (TranslationResult::placeholder(request), failures)
    }

    async fn call_provider(
        &self,
        provider: &dyn TranslationProvider,
        request: &TranslationRequest,
    ) -> Result<String, ProviderError> {
        let call = provider.translate(&request.text, &request.source_lang, &request.target_lang);
        tokio::time::timeout(provider.timeout(), call).await?
    }

    /// 获取统计快照
    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot(self.cache_size())
    }

    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, ResultCache::size)
    }

    /// 清空结果缓存，返回删除的条目数
    pub fn clear_cache(&self) -> usize {
        self.cache.as_ref().map_or(0, ResultCache::clear)
    }

    /// 清理过期缓存条目
    pub fn cleanup_cache(&self) -> usize {
        self.cache.as_ref().map_or(0, ResultCache::cleanup_expired)
    }

    /// 提供方链中各适配器名称，按尝试顺序
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// 获取服务健康状态
    ///
    /// 提供方链为空时服务仍能响应（只返回占位译文），视为降级。
    pub fn get_health(&self) -> HealthStatus {
        let mut components = HashMap::new();

        let providers = if self.providers.is_empty() {
            HealthLevel::Degraded
        } else {
            HealthLevel::Healthy
        };
        components.insert("providers".to_string(), providers);

        let cache = if self.cache.is_some() {
            HealthLevel::Healthy
        } else {
            HealthLevel::Degraded
        };
        components.insert("cache".to_string(), cache);

        let overall = if components.values().any(|&l| l == HealthLevel::Unhealthy) {
            HealthLevel::Unhealthy
        } else if components.values().all(|&l| l == HealthLevel::Healthy) {
            HealthLevel::Healthy
        } else {
            HealthLevel::Degraded
        };

        HealthStatus {
            overall,
            components,
        }
    }
}

/// 翻译服务的健康状态报告
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub overall: HealthLevel,
    pub components: HashMap<String, HealthLevel>,
}

/// 健康状态级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Degraded,
    Unhealthy,
}
