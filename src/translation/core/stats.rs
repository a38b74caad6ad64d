//! 翻译服务统计
//!
//! 计数器在进程生命周期内单调递增，同时写入 `metrics` 门面，
//! 安装了导出器的部署可以直接抓取。

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::translation::error::ProviderError;
use crate::translation::types::{ProviderTag, TranslationResult};

/// 翻译服务统计信息（线程安全版本）
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 返回给调用方的译文总数，包括缓存命中
    translations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    primary: AtomicU64,
    secondary: AtomicU64,
    fallback: AtomicU64,
    /// 累计单词数
    words: AtomicU64,
    rate_limited_failures: AtomicU64,
    unavailable_failures: AtomicU64,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次由提供方链产生的结果
    pub fn record_translation(&self, result: &TranslationResult) {
        self.translations.fetch_add(1, Ordering::Relaxed);
        self.words
            .fetch_add(result.word_count as u64, Ordering::Relaxed);

        let tier = match result.provider {
            ProviderTag::Primary => &self.primary,
            ProviderTag::Secondary => &self.secondary,
            ProviderTag::Fallback => &self.fallback,
        };
        tier.fetch_add(1, Ordering::Relaxed);

        metrics::counter!("translink_translations_total", "tier" => result.provider.as_str())
            .increment(1);
    }

    /// 记录缓存命中，命中的结果同样计入译文总数
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        self.translations.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("translink_cache_hits_total").increment(1);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("translink_cache_misses_total").increment(1);
    }

    /// 记录单个适配器的失败
    pub fn record_failure(&self, error: &ProviderError) {
        let counter = match error {
            ProviderError::RateLimited(_) => &self.rate_limited_failures,
            ProviderError::Unavailable(_) => &self.unavailable_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("translink_provider_failures_total", "reason" => error.reason())
            .increment(1);
    }

    /// 获取统计数据快照
    pub fn snapshot(&self, active_cache: usize) -> StatsSnapshot {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let lookups = cache_hits + cache_misses;
        let cache_hit_rate = if lookups == 0 {
            0.0
        } else {
            (cache_hits as f64 / lookups as f64 * 10_000.0).round() / 100.0
        };

        StatsSnapshot {
            total_translations: self.translations.load(Ordering::Relaxed),
            cache_hits,
            cache_misses,
            cache_hit_rate,
            active_cache,
            primary: self.primary.load(Ordering::Relaxed),
            secondary: self.secondary.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
            total_words: self.words.load(Ordering::Relaxed),
            rate_limited_failures: self.rate_limited_failures.load(Ordering::Relaxed),
            unavailable_failures: self.unavailable_failures.load(Ordering::Relaxed),
        }
    }
}

/// 统计数据的不可变快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_translations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// 百分比，保留两位小数
    pub cache_hit_rate: f64,
    pub active_cache: usize,
    pub primary: u64,
    pub secondary: u64,
    pub fallback: u64,
    pub total_words: u64,
    pub rate_limited_failures: u64,
    pub unavailable_failures: u64,
}
