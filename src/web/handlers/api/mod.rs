//! API 处理器

pub mod cache;
pub mod history;
pub mod stats;
pub mod translation;

pub use cache::*;
pub use history::*;
pub use stats::*;
pub use translation::*;

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};

use crate::translation::TranslationError;

/// 处理器错误响应
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 校验失败统一返回 400 `{error: "Invalid input", details}`
pub fn invalid_input(error: TranslationError) -> ApiError {
    error.log();
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": "Invalid input",
            "details": error.to_string(),
        })),
    )
}

/// 请求体无法解析，超出大小限制时保留 413
pub fn reject_body(rejection: JsonRejection) -> ApiError {
    let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };
    tracing::info!("请求体无效: {}", rejection.body_text());
    (
        status,
        Json(serde_json::json!({
            "error": "Invalid input",
            "details": rejection.body_text(),
        })),
    )
}

/// 服务端错误
pub fn internal_error(error: TranslationError) -> ApiError {
    error.log();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": error.to_string(),
        })),
    )
}
