//! 缓存系统集成测试
//!
//! 测试结果缓存的命中、过期与清理

use std::time::Duration;

use translink::translation::{ProviderTag, TranslationConfig, TranslationRequest};

mod common;

use common::{service_with, service_with_config, Outcome, StubProvider};

/// 测试 TTL 内重复请求命中缓存
#[tokio::test]
async fn test_repeat_within_ttl_is_cache_hit() {
    let primary = StubProvider::ok("primary", "Bonjour");
    let service = service_with(&[primary.clone()]);
    let request = TranslationRequest::new("Hello", "en", "fr");

    let first = service.resolve(&request).await;
    let second = service.resolve(&request).await;

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(first.result, second.result);
    assert_eq!(primary.calls(), 1);

    let snapshot = service.stats_snapshot();
    assert_eq!(snapshot.cache_hits, 1);
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.total_translations, 2);
    assert_eq!(snapshot.cache_hit_rate, 50.0);
    assert_eq!(snapshot.active_cache, 1);
}

/// 缓存键忽略文本大小写
#[tokio::test]
async fn test_cache_key_is_case_insensitive_for_text() {
    let primary = StubProvider::ok("primary", "Bonjour");
    let service = service_with(&[primary.clone()]);

    service
        .resolve(&TranslationRequest::new("Hello", "en", "fr"))
        .await;
    let hit = service
        .resolve(&TranslationRequest::new("HELLO", "en", "fr"))
        .await;
    let other_target = service
        .resolve(&TranslationRequest::new("Hello", "en", "de"))
        .await;

    assert!(hit.cache_hit);
    assert!(!other_target.cache_hit);
    assert_eq!(primary.calls(), 2);
}

/// 过期后重新调用提供方
#[tokio::test(start_paused = true)]
async fn test_expired_entry_calls_provider_again() {
    let primary = StubProvider::new(
        "primary",
        vec![Outcome::Ok("Bonjour".to_string()), Outcome::Ok("Salut".to_string())],
    );
    let config = TranslationConfig {
        cache_ttl_secs: 60,
        ..TranslationConfig::default()
    };
    let service = service_with_config(&[primary.clone()], &config);
    let request = TranslationRequest::new("Hello", "en", "fr");

    assert_eq!(service.resolve(&request).await.result.translated_text, "Bonjour");

    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(service.resolve(&request).await.cache_hit);

    tokio::time::advance(Duration::from_secs(31)).await;
    let refreshed = service.resolve(&request).await;
    assert!(!refreshed.cache_hit);
    assert_eq!(refreshed.result.translated_text, "Salut");
    assert_eq!(primary.calls(), 2);
}

/// 占位译文同样会被缓存
#[tokio::test]
async fn test_placeholder_is_cached() {
    let primary = StubProvider::failing("primary", Outcome::Unavailable);
    let service = service_with(&[primary.clone()]);
    let request = TranslationRequest::new("Good evening", "en", "ja");

    let first = service.resolve(&request).await;
    let second = service.resolve(&request).await;

    assert_eq!(first.result.provider, ProviderTag::Fallback);
    assert!(second.cache_hit);
    assert_eq!(second.result.translated_text, "Good evening (JA)");
    // 命中缓存时不再报告失败
    assert!(second.failures.is_empty());
    assert_eq!(primary.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_and_cleanup() {
    let config = TranslationConfig {
        cache_ttl_secs: 10,
        ..TranslationConfig::default()
    };
    let service = service_with_config(&[StubProvider::ok("primary", "x")], &config);

    for text in ["a", "b", "c"] {
        service
            .resolve(&TranslationRequest::new(text, "en", "fr"))
            .await;
    }
    assert_eq!(service.cache_size(), 3);

    tokio::time::advance(Duration::from_secs(11)).await;
    assert_eq!(service.cache_size(), 0);
    assert_eq!(service.cleanup_cache(), 3);

    service
        .resolve(&TranslationRequest::new("d", "en", "fr"))
        .await;
    assert_eq!(service.clear_cache(), 1);
    assert_eq!(service.cache_size(), 0);
}

/// 限流占位译文在缓存中保留限流状态，短暂过期后重新尝试提供方
#[tokio::test(start_paused = true)]
async fn test_rate_limited_placeholder_is_retried_soon() {
    let primary = StubProvider::new(
        "primary",
        vec![Outcome::RateLimited, Outcome::Ok("Bonjour".to_string())],
    );
    let service = service_with(&[primary.clone()]);
    let request = TranslationRequest::new("Hello", "en", "fr");

    let first = service.resolve(&request).await;
    assert!(first.rate_limited());

    let replayed = service.resolve(&request).await;
    assert!(replayed.cache_hit);
    assert!(replayed.rate_limited());
    assert_eq!(replayed.result.translated_text, "Hello (FR)");
    assert_eq!(primary.calls(), 1);

    tokio::time::advance(Duration::from_secs(5)).await;
    let recovered = service.resolve(&request).await;
    assert!(!recovered.cache_hit);
    assert!(!recovered.rate_limited());
    assert_eq!(recovered.result.translated_text, "Bonjour");
    assert_eq!(primary.calls(), 2);

    // 真实译文按正常 TTL 缓存
    tokio::time::advance(Duration::from_secs(60)).await;
    assert!(service.resolve(&request).await.cache_hit);
}
