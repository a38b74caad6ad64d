//! 存储模块
//!
//! 提供结果缓存和翻译历史存储。

pub mod cache;
pub mod history;

pub use cache::{CacheEntry, ResultCache};
pub use history::{HistoryQuery, HistoryStore, MemoryHistoryStore, TranslationRecord};
