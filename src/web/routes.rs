//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        // 翻译
        .route("/api/translations", post(translate))
        .route("/api/translations/translate", post(translate_envelope))
        .route("/api/translations/batch", post(translate_batch))
        .route("/api/translations/history", get(get_history))
        .route("/api/translations/stats", get(get_stats))
        // 管理
        .route("/api/cache/clear", post(clear_cache))
}
