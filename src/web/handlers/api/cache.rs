//! 缓存相关API处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::types::AppState;

/// 清空结果缓存
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let deleted_count = state.service.clear_cache();

    Json(serde_json::json!({
        "success": true,
        "message": format!("成功清理 {} 个缓存条目", deleted_count),
        "deleted_count": deleted_count
    }))
}
