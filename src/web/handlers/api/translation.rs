//! 翻译相关API处理器

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::{invalid_input, reject_body, ApiError};
use crate::translation::{Resolution, TranslationRequest};
use crate::web::types::{
    AppState, BatchRequest, BatchResponse, BatchSummary, EnvelopeResponse, RateLimitedResponse,
    ResponseMetrics, TranslateResponse, RATE_LIMITED_MESSAGE,
};

async fn validate_and_resolve(
    state: &AppState,
    request: &TranslationRequest,
) -> Result<Resolution, ApiError> {
    state.service.validate(request).map_err(invalid_input)?;

    tracing::info!(
        "翻译请求: {} -> {} ({} 字符)",
        request.source_lang,
        request.target_lang,
        request.text.chars().count()
    );

    let resolution = state.service.resolve(request).await;
    state.record_history(request, &resolution.result).await;
    Ok(resolution)
}

/// 单条翻译
///
/// 占位译文且存在限流失败时返回 429，客户端仍可展示附带的占位译文。
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let resolution = validate_and_resolve(&state, &request).await?;

    if resolution.rate_limited() {
        tracing::warn!("提供方限流，返回 429");
        let body = RateLimitedResponse {
            error: RATE_LIMITED_MESSAGE,
            translated_text: resolution.result.translated_text,
        };
        return Ok((StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response());
    }

    Ok(Json(TranslateResponse::from(&resolution)).into_response())
}

/// 单条翻译（信封格式），附带耗时和缓存命中信息
pub async fn translate_envelope(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<EnvelopeResponse>, ApiError> {
    let started = Instant::now();
    let Json(request) = payload.map_err(reject_body)?;
    let resolution = validate_and_resolve(&state, &request).await?;

    Ok(Json(EnvelopeResponse {
        success: true,
        metrics: ResponseMetrics {
            response_time: started.elapsed().as_millis() as u64,
            cache_hit: resolution.cache_hit,
        },
        data: resolution.result,
    }))
}

/// 批量翻译
///
/// 先校验全部请求，任何一条无效则整批拒绝。
pub async fn translate_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(batch) = payload.map_err(reject_body)?;

    for (index, request) in batch.translations.iter().enumerate() {
        state
            .service
            .validate(request)
            .map_err(|e| invalid_input(e.with_context(format!("translations[{}]", index))))?;
    }

    let resolutions = state
        .service
        .resolve_batch(&batch.translations)
        .await
        .map_err(invalid_input)?;

    for (request, resolution) in batch.translations.iter().zip(&resolutions) {
        state.record_history(request, &resolution.result).await;
    }

    let failed = resolutions
        .iter()
        .filter(|r| r.result.is_placeholder())
        .count();
    let summary = BatchSummary {
        total: resolutions.len(),
        successful: resolutions.len() - failed,
        failed,
    };
    tracing::info!(
        "批量翻译完成: 共 {} 条，失败 {} 条",
        summary.total,
        summary.failed
    );

    Ok(Json(BatchResponse {
        success: true,
        data: resolutions.iter().map(TranslateResponse::from).collect(),
        summary,
    }))
}
