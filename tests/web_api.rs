//! HTTP 接口集成测试

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use translink::translation::{HistoryStore, MemoryHistoryStore, TranslationService};
use translink::web::{create_router, AppState, RATE_LIMITED_MESSAGE};

mod common;

use common::{service_with, Outcome, StubProvider};

fn app(service: TranslationService) -> (Router, Arc<MemoryHistoryStore>) {
    let history = Arc::new(MemoryHistoryStore::new());
    let state = AppState::new(
        Arc::new(service),
        Some(history.clone() as Arc<dyn HistoryStore>),
    );
    (create_router(Arc::new(state)), history)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_translate_success() {
    let (app, history) = app(service_with(&[StubProvider::ok("gemini", "Bonjour")]));

    let (status, body) = send(
        &app,
        post_json(
            "/api/translations",
            json!({"text": "Hello", "sourceLang": "en", "targetLang": "fr"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "Bonjour");
    assert_eq!(body["provider"], "primary");
    assert_eq!(body["wordCount"], 1);
    assert_eq!(body["engine"], "gemini");
    assert_eq!(body["cacheHit"], false);
    assert_eq!(history.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_second_request_reports_cache_hit() {
    let (app, _) = app(service_with(&[StubProvider::ok("gemini", "Bonjour")]));
    let request = json!({"text": "Hello", "targetLang": "fr"});

    send(&app, post_json("/api/translations", request.clone())).await;
    let (_, body) = send(&app, post_json("/api/translations", request)).await;

    assert_eq!(body["cacheHit"], true);
}

#[tokio::test]
async fn test_rate_limited_placeholder_returns_429() {
    let (app, _) = app(service_with(&[
        StubProvider::failing("gemini", Outcome::RateLimited),
        StubProvider::failing("libretranslate", Outcome::Unavailable),
    ]));

    let (status, body) = send(
        &app,
        post_json("/api/translations", json!({"text": "Hello", "targetLang": "fr"})),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], RATE_LIMITED_MESSAGE);
    assert_eq!(body["translatedText"], "Hello (FR)");
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_429_stays_429_until_retry_window() {
    let stub = StubProvider::new(
        "gemini",
        vec![Outcome::RateLimited, Outcome::Ok("Bonjour".to_string())],
    );
    let (app, _) = app(service_with(&[stub.clone()]));
    let request = json!({"text": "Hello", "targetLang": "fr"});

    let (status, _) = send(&app, post_json("/api/translations", request.clone())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, body) = send(&app, post_json("/api/translations", request.clone())).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["translatedText"], "Hello (FR)");
    assert_eq!(stub.calls(), 1);

    tokio::time::advance(std::time::Duration::from_secs(5)).await;
    let (status, body) = send(&app, post_json("/api/translations", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "Bonjour");
    assert_eq!(body["cacheHit"], false);
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_unavailable_placeholder_returns_200() {
    let (app, _) = app(service_with(&[StubProvider::failing(
        "libretranslate",
        Outcome::Unavailable,
    )]));

    let (status, body) = send(
        &app,
        post_json("/api/translations", json!({"text": "Hello", "targetLang": "fr"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translatedText"], "Hello (FR)");
    assert_eq!(body["provider"], "fallback");
}

#[tokio::test]
async fn test_invalid_input_returns_400() {
    let stub = StubProvider::ok("gemini", "x");
    let (app, _) = app(service_with(&[stub.clone()]));

    for payload in [
        json!({"text": "", "targetLang": "fr"}),
        json!({"text": "Hello", "targetLang": "xx"}),
        json!({"targetLang": "fr"}),
    ] {
        let (status, body) = send(&app, post_json("/api/translations", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input");
        assert!(body["details"].is_string());
    }

    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (app, _) = app(service_with(&[StubProvider::ok("gemini", "x")]));
    let text = "a".repeat(11 * 1024);

    let (status, _) = send(
        &app,
        post_json("/api/translations", json!({"text": text, "targetLang": "fr"})),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_envelope_endpoint() {
    let (app, _) = app(service_with(&[StubProvider::ok("gemini", "Hola")]));

    let (status, body) = send(
        &app,
        post_json(
            "/api/translations/translate",
            json!({"text": "Hello", "targetLang": "es"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["translatedText"], "Hola");
    assert_eq!(body["metrics"]["cacheHit"], false);
    assert!(body["metrics"]["responseTime"].is_u64());
}

#[tokio::test]
async fn test_batch_endpoint_summary() {
    let (app, history) = app(service_with(&[StubProvider::new(
        "gemini",
        vec![Outcome::Ok("un".to_string()), Outcome::Unavailable],
    )]));

    let (status, body) = send(
        &app,
        post_json(
            "/api/translations/batch",
            json!({"translations": [
                {"text": "one", "targetLang": "fr"},
                {"text": "two", "targetLang": "fr"}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], json!({"total": 2, "successful": 1, "failed": 1}));
    assert_eq!(body["data"][0]["translatedText"], "un");
    assert_eq!(body["data"][1]["translatedText"], "two (FR)");
    assert_eq!(history.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_batch_over_limit_is_rejected() {
    let (app, _) = app(service_with(&[StubProvider::ok("gemini", "x")]));
    let translations: Vec<Value> = (0..11)
        .map(|i| json!({"text": format!("t{}", i), "targetLang": "fr"}))
        .collect();

    let (status, body) = send(
        &app,
        post_json("/api/translations/batch", json!({"translations": translations})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input");
}

#[tokio::test]
async fn test_history_endpoint_filters_and_orders() {
    let (app, _) = app(service_with(&[StubProvider::new(
        "gemini",
        vec![
            Outcome::Ok("un".to_string()),
            Outcome::Unavailable,
            Outcome::Ok("trois".to_string()),
        ],
    )]));

    for text in ["one", "two", "three"] {
        send(
            &app,
            post_json("/api/translations", json!({"text": text, "targetLang": "fr"})),
        )
        .await;
    }

    let (status, body) = send(&app, get("/api/translations/history?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["originalText"], "three");
    assert_eq!(body["data"][1]["originalText"], "two");

    let (_, body) = send(&app, get("/api/translations/history?provider=fallback")).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["translatedText"], "two (FR)");
}

#[tokio::test]
async fn test_stats_and_cache_clear() {
    let (app, _) = app(service_with(&[StubProvider::ok("gemini", "Bonjour")]));
    let request = json!({"text": "Hello", "targetLang": "fr"});
    send(&app, post_json("/api/translations", request.clone())).await;
    send(&app, post_json("/api/translations", request)).await;

    let (status, body) = send(&app, get("/api/translations/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalTranslations"], 2);
    assert_eq!(body["data"]["cacheHitRate"], 50.0);
    assert_eq!(body["data"]["activeCache"], 1);
    assert_eq!(body["data"]["providers"], json!(["gemini"]));

    let (status, body) = send(&app, post_json("/api/cache/clear", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_count"], 1);

    let (_, body) = send(&app, get("/api/translations/stats")).await;
    assert_eq!(body["data"]["activeCache"], 0);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let (app, _) = app(service_with(&[
        StubProvider::ok("gemini", "x"),
        StubProvider::ok("mymemory", "y"),
    ]));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["overall"], "healthy");
    assert_eq!(body["components"]["providers"], "healthy");
    assert_eq!(body["components"]["cache"], "healthy");
    assert_eq!(body["providers"], json!(["gemini", "mymemory"]));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_degraded_without_providers() {
    let (app, _) = app(service_with(&[]));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["overall"], "degraded");
    assert_eq!(body["components"]["providers"], "degraded");
    assert_eq!(body["providers"], json!([]));
}
