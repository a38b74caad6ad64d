//! 翻译结果缓存
//!
//! 键为规范化请求的摘要，值为完整的 [`TranslationResult`]。
//! 条目在 TTL 后失效，读取时惰性删除，没有容量淘汰。
//! 限流导致的占位译文使用较短的 TTL，过期后重新尝试提供方。

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::translation::config::constants;
use crate::translation::types::TranslationResult;

/// 缓存条目，写入后不再修改，只会被替换或删除
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: TranslationResult,
    /// 写入时提供方链因限流而返回占位译文
    pub rate_limited: bool,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(result: TranslationResult, rate_limited: bool, ttl: Duration) -> Self {
        Self {
            result,
            rate_limited,
            expires_at: Instant::now() + ttl,
        }
    }

    /// 检查条目是否过期
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// 线程安全的结果缓存
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    rate_limited_ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            rate_limited_ttl: ttl.min(constants::RATE_LIMITED_CACHE_TTL),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn rate_limited_ttl(&self) -> Duration {
        self.rate_limited_ttl
    }

    /// 获取未过期的条目，过期条目在此处删除
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            // 读锁已释放，再次确认后删除，避免误删并发写入的新条目
            self.entries.remove_if(key, |_, entry| entry.is_expired());
            tracing::debug!("缓存条目已过期: {}", key);
        }
        None
    }

    /// 写入结果，覆盖同键旧条目
    pub fn set(&self, key: String, result: TranslationResult, rate_limited: bool) {
        let ttl = if rate_limited {
            self.rate_limited_ttl
        } else {
            self.ttl
        };
        self.entries
            .insert(key, CacheEntry::new(result, rate_limited, ttl));
    }

    /// 未过期条目数量
    pub fn size(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.is_expired())
            .count()
    }

    /// 清空缓存，返回删除的条目数
    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        tracing::info!("缓存已清空，删除 {} 个条目", count);
        count
    }

    /// 删除所有过期条目，返回删除数量
    pub fn cleanup_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!("清理了 {} 个过期缓存条目", removed);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::types::ProviderTag;

    fn result(text: &str) -> TranslationResult {
        TranslationResult {
            translated_text: text.to_string(),
            provider: ProviderTag::Primary,
            word_count: 1,
            engine: "stub".to_string(),
        }
    }

    #[test]
    fn test_set_and_get() {
        let cache = ResultCache::new(Duration::from_secs(60));
        assert!(cache.get("k").is_none());

        cache.set("k".to_string(), result("Bonjour"), false);
        assert_eq!(cache.get("k").unwrap().result.translated_text, "Bonjour");
        assert_eq!(cache.size(), 1);

        cache.set("k".to_string(), result("Salut"), false);
        assert_eq!(cache.get("k").unwrap().result.translated_text, "Salut");
        assert_eq!(cache.size(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = ResultCache::new(Duration::from_secs(10));
        cache.set("a".to_string(), result("A"), false);

        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("b".to_string(), result("B"), false);
        assert_eq!(cache.size(), 2);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert_eq!(cache.size(), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.cleanup_expired(), 1);
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_clear_reports_removed() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache.set("a".to_string(), result("A"), false);
        cache.set("b".to_string(), result("B"), false);
        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.size(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_entry_uses_short_ttl() {
        let cache = ResultCache::new(Duration::from_secs(3600));
        cache.set("busy".to_string(), result("Hello (FR)"), true);
        cache.set("ok".to_string(), result("Bonjour"), false);

        let entry = cache.get("busy").unwrap();
        assert!(entry.rate_limited);
        assert!(!cache.get("ok").unwrap().rate_limited);

        tokio::time::advance(cache.rate_limited_ttl()).await;
        assert!(cache.get("busy").is_none());
        assert!(cache.get("ok").is_some());
    }

    #[test]
    fn test_rate_limited_ttl_never_exceeds_ttl() {
        let cache = ResultCache::new(Duration::from_secs(1));
        assert_eq!(cache.rate_limited_ttl(), Duration::from_secs(1));
    }
}
