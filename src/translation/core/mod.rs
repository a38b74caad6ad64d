//! 翻译系统核心模块
//!
//! - **服务层** (`service.rs`): 回退编排器，协调缓存、提供方链和统计
//! - **统计** (`stats.rs`): 原子计数器与快照
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── ResultCache (storage/cache.rs)
//!     ├── ServiceStats (stats.rs)
//!     └── Vec<Arc<dyn TranslationProvider>> (providers/)
//! ```

pub mod service;
pub mod stats;

/// 统一翻译服务 - 主要的对外接口
pub use service::TranslationService;

/// 系统健康状态检查结果
pub use service::{HealthLevel, HealthStatus};

/// 服务运行统计信息
pub use stats::{ServiceStats, StatsSnapshot};
