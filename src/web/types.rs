//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::translation::{
    HealthStatus, HistoryStore, ProviderTag, Resolution, StatsSnapshot, TranslationRecord, TranslationRequest,
    TranslationResult, TranslationService,
};

/// 限流时返回给客户端的提示
pub const RATE_LIMITED_MESSAGE: &str = "Service busy. Please try again in a few seconds.";

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    /// 为 `None` 时不记录历史
    pub history: Option<Arc<dyn HistoryStore>>,
}

impl AppState {
    pub fn new(service: Arc<TranslationService>, history: Option<Arc<dyn HistoryStore>>) -> Self {
        Self { service, history }
    }

    /// 写入历史记录，失败只记录日志
    pub async fn record_history(&self, request: &TranslationRequest, result: &TranslationResult) {
        if let Some(history) = &self.history {
            let record = TranslationRecord::new(request, result);
            if let Err(e) = history.record(record).await {
                tracing::warn!("历史记录写入失败 ({}): {}", history.name(), e);
            }
        }
    }
}

/// 单条翻译响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    #[serde(flatten)]
    pub result: TranslationResult,
    pub cache_hit: bool,
}

impl From<&Resolution> for TranslateResponse {
    fn from(resolution: &Resolution) -> Self {
        Self {
            result: resolution.result.clone(),
            cache_hit: resolution.cache_hit,
        }
    }
}

/// 限流响应（HTTP 429），仍附带占位译文
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedResponse {
    pub error: &'static str,
    pub translated_text: String,
}

/// 信封格式的请求指标
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetrics {
    /// 毫秒
    pub response_time: u64,
    pub cache_hit: bool,
}

/// `/api/translations/translate` 的信封响应
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeResponse {
    pub success: bool,
    pub data: TranslationResult,
    pub metrics: ResponseMetrics,
}

/// 批量翻译请求
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub translations: Vec<TranslationRequest>,
}

/// 批量结果汇总，`failed` 为占位译文数量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub data: Vec<TranslateResponse>,
    pub summary: BatchSummary,
}

/// 历史查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
    pub provider: Option<ProviderTag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<TranslationRecord>,
    pub count: usize,
}

/// 统计数据，`historyCount` 在历史存储可用时提供
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    #[serde(flatten)]
    pub snapshot: StatsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_count: Option<u64>,
    pub providers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsData,
}

/// 健康检查响应
///
/// `status` 表示进程存活，服务是否降级见 `overall` 与 `components`。
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub health: HealthStatus,
    pub providers: Vec<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
