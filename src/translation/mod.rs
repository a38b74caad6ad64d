//! 翻译模块
//!
//! 多提供方翻译回退链：
//! - **providers**: 提供方适配器（Gemini、LibreTranslate、MyMemory）
//! - **core**: 回退编排器与统计
//! - **storage**: 结果缓存和翻译历史
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use translink::translation::{TranslationRequest, TranslationService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::create_default()?;
//! let resolution = service
//!     .resolve(&TranslationRequest::new("Good morning", "auto", "es"))
//!     .await;
//! println!("{}", resolution.result.translated_text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod providers;
pub mod storage;
pub mod types;

pub use config::{ConfigManager, TranslationConfig};
pub use self::core::{HealthLevel, HealthStatus, ServiceStats, StatsSnapshot, TranslationService};
pub use error::{ErrorCategory, ErrorSeverity, ProviderError, ServiceResult, TranslationError};
pub use providers::{build_chain, ProviderKind, TranslationProvider};
pub use storage::{HistoryQuery, HistoryStore, MemoryHistoryStore, ResultCache, TranslationRecord};
pub use types::{
    count_words, AdapterFailure, ProviderTag, Resolution, TranslationRequest, TranslationResult,
};
