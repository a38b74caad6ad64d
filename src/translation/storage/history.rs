//! 翻译历史记录
//!
//! HTTP 层每返回一次译文就写入一条记录。写入失败只记录日志，不影响请求。
//! 内存实现用于测试和未配置数据库的部署，MongoDB 实现见 `web::history`。

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::translation::error::ServiceResult;
use crate::translation::types::{ProviderTag, TranslationRequest, TranslationResult};

/// 默认查询条数
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// 单次查询上限
pub const MAX_HISTORY_LIMIT: usize = 200;

/// 历史记录文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub original_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub translated_text: String,
    pub provider: ProviderTag,
    pub engine: String,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

impl TranslationRecord {
    pub fn new(request: &TranslationRequest, result: &TranslationResult) -> Self {
        Self {
            original_text: request.text.clone(),
            source_lang: request.source_lang.clone(),
            target_lang: request.target_lang.clone(),
            translated_text: result.translated_text.clone(),
            provider: result.provider,
            engine: result.engine.clone(),
            word_count: result.word_count,
            created_at: Utc::now(),
        }
    }
}

/// 历史查询条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: usize,
    pub provider: Option<ProviderTag>,
}

impl HistoryQuery {
    /// 构建查询，条数限制在 1..=200 之间
    pub fn new(limit: Option<usize>, provider: Option<ProviderTag>) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_HISTORY_LIMIT)
                .clamp(1, MAX_HISTORY_LIMIT),
            provider,
        }
    }

    pub fn matches(&self, record: &TranslationRecord) -> bool {
        self.provider.map_or(true, |p| p == record.provider)
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 历史记录存储
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 存储名称，用于日志
    fn name(&self) -> &str;

    async fn record(&self, record: TranslationRecord) -> ServiceResult<()>;

    /// 最近的记录，按时间倒序
    async fn recent(&self, query: HistoryQuery) -> ServiceResult<Vec<TranslationRecord>>;

    async fn count(&self) -> ServiceResult<u64>;
}

/// 内存历史存储，超过容量时丢弃最旧的记录
pub struct MemoryHistoryStore {
    records: RwLock<VecDeque<TranslationRecord>>,
    capacity: usize,
}

impl MemoryHistoryStore {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY))),
            capacity: capacity.max(1),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn record(&self, record: TranslationRecord) -> ServiceResult<()> {
        let mut records = self.records.write().await;
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }

    async fn recent(&self, query: HistoryQuery) -> ServiceResult<Vec<TranslationRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| query.matches(r))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> ServiceResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
