//! 统计API处理器

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::web::types::{AppState, StatsData, StatsResponse};

/// 服务统计
///
/// 历史存储可用时 `totalTranslations` 取其记录数，否则使用进程内计数器。
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let mut snapshot = state.service.stats_snapshot();

    let history_count = match &state.history {
        Some(history) => match history.count().await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!("读取历史记录数量失败: {}", e);
                None
            }
        },
        None => None,
    };

    if let Some(count) = history_count {
        snapshot.total_translations = count;
    }

    Json(StatsResponse {
        success: true,
        data: StatsData {
            snapshot,
            history_count,
            providers: state.service.provider_names(),
        },
    })
}
