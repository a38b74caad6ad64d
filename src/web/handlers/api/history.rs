//! 翻译历史API处理器

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};

use super::{internal_error, ApiError};
use crate::translation::HistoryQuery;
use crate::web::types::{AppState, HistoryParams, HistoryResponse};

/// 最近的翻译记录，按时间倒序
///
/// 未启用历史记录时返回空列表。
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let records = match &state.history {
        Some(history) => history
            .recent(HistoryQuery::new(params.limit, params.provider))
            .await
            .map_err(internal_error)?,
        None => Vec::new(),
    };

    Ok(Json(HistoryResponse {
        success: true,
        count: records.len(),
        data: records,
    }))
}
