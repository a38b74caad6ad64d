//! 基于 MongoDB 的翻译历史存储

use async_trait::async_trait;
use bson::{doc, DateTime};
use futures::stream::TryStreamExt;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::translation::error::ServiceResult;
use crate::translation::storage::{HistoryQuery, HistoryStore, TranslationRecord};
use crate::translation::ProviderTag;
use crate::web::config::MongoConfig;

/// MongoDB 中存储的历史文档
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<bson::oid::ObjectId>,
    original_text: String,
    source_lang: String,
    target_lang: String,
    translated_text: String,
    provider: ProviderTag,
    engine: String,
    word_count: i64,
    created_at: DateTime,
}

impl From<TranslationRecord> for HistoryDocument {
    fn from(record: TranslationRecord) -> Self {
        Self {
            id: None,
            original_text: record.original_text,
            source_lang: record.source_lang,
            target_lang: record.target_lang,
            translated_text: record.translated_text,
            provider: record.provider,
            engine: record.engine,
            word_count: record.word_count as i64,
            created_at: DateTime::from_chrono(record.created_at),
        }
    }
}

impl From<HistoryDocument> for TranslationRecord {
    fn from(document: HistoryDocument) -> Self {
        Self {
            original_text: document.original_text,
            source_lang: document.source_lang,
            target_lang: document.target_lang,
            translated_text: document.translated_text,
            provider: document.provider,
            engine: document.engine,
            word_count: document.word_count.max(0) as usize,
            created_at: document.created_at.to_chrono(),
        }
    }
}

/// MongoDB 历史存储
pub struct MongoHistoryStore {
    collection: Collection<HistoryDocument>,
}

impl MongoHistoryStore {
    /// 连接数据库并确认服务可达
    pub async fn connect(config: &MongoConfig) -> ServiceResult<Self> {
        let client = Client::with_uri_str(&config.connection_string).await?;
        let database = client.database(&config.database_name);
        database.run_command(doc! { "ping": 1 }).await?;

        tracing::info!(
            "MongoDB 连接成功: {}/{}",
            config.database_name,
            config.collection_name
        );

        Ok(Self {
            collection: database.collection::<HistoryDocument>(&config.collection_name),
        })
    }
}

#[async_trait]
impl HistoryStore for MongoHistoryStore {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn record(&self, record: TranslationRecord) -> ServiceResult<()> {
        self.collection
            .insert_one(HistoryDocument::from(record))
            .await?;
        Ok(())
    }

    async fn recent(&self, query: HistoryQuery) -> ServiceResult<Vec<TranslationRecord>> {
        let filter = match query.provider {
            Some(provider) => doc! { "provider": provider.as_str() },
            None => doc! {},
        };

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .limit(query.limit as i64)
            .await?;

        let documents: Vec<HistoryDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(TranslationRecord::from).collect())
    }

    async fn count(&self) -> ServiceResult<u64> {
        Ok(self.collection.estimated_document_count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::{TranslationRequest, TranslationResult};

    #[test]
    fn test_document_conversion_keeps_fields() {
        let request = TranslationRequest::new("Good night", "en", "it");
        let result = TranslationResult {
            translated_text: "Buona notte".to_string(),
            provider: ProviderTag::Secondary,
            word_count: 2,
            engine: "libretranslate".to_string(),
        };
        let record = TranslationRecord::new(&request, &result);

        let document = HistoryDocument::from(record.clone());
        let bson_doc = bson::to_document(&document).unwrap();
        assert_eq!(bson_doc.get_str("provider").unwrap(), "secondary");
        assert!(bson_doc.get_datetime("createdAt").is_ok());
        assert!(!bson_doc.contains_key("_id"));

        let back = TranslationRecord::from(document);
        assert_eq!(back.translated_text, record.translated_text);
        // BSON 时间只保留毫秒精度
        assert_eq!(
            back.created_at.timestamp_millis(),
            record.created_at.timestamp_millis()
        );
    }
}
