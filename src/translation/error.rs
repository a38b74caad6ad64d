//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。
//!
//! - [`ProviderError`]: 单个提供方的失败，只有限流和不可用两类，编排器据此决定回退
//! - [`TranslationError`]: 编排器之外的错误（输入校验、配置、存储等）

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// 提供方失败类型
///
/// 适配器只返回这两种结构化变体，调用方不需要再解析错误消息。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum ProviderError {
    /// 远端返回配额耗尽或速率限制
    #[error("提供方限流: {0}")]
    RateLimited(String),

    /// 网络失败、超时、非成功状态或响应格式错误
    #[error("提供方不可用: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// 是否为限流失败
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }

    /// 失败原因的短名称，用于日志和指标标签
    pub fn reason(&self) -> &'static str {
        match self {
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::Unavailable(_) => "unavailable",
        }
    }

    /// 根据 HTTP 状态码归类失败
    pub fn from_status(status: reqwest::StatusCode, detail: impl fmt::Display) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            ProviderError::RateLimited(format!("HTTP {}: {}", status.as_u16(), detail))
        } else {
            ProviderError::Unavailable(format!("HTTP {}: {}", status.as_u16(), detail))
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => ProviderError::from_status(status, &error),
            None if error.is_timeout() => ProviderError::Unavailable(format!("请求超时: {}", error)),
            None => ProviderError::Unavailable(format!("网络错误: {}", error)),
        }
    }
}

impl From<tokio::time::error::Elapsed> for ProviderError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        ProviderError::Unavailable(format!("提供方超时: {}", error))
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        ProviderError::Unavailable(format!("响应格式错误: {}", error))
    }
}

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 历史记录存储错误
    #[error("存储错误: {0}")]
    StorageError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::StorageError(_) => ErrorSeverity::Warning,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let wrap = |msg: String| format!("{} (上下文: {})", msg, context);
        match self {
            TranslationError::InvalidInput(msg) => TranslationError::InvalidInput(wrap(msg)),
            TranslationError::ConfigError(msg) => TranslationError::ConfigError(wrap(msg)),
            TranslationError::NetworkError(msg) => TranslationError::NetworkError(wrap(msg)),
            TranslationError::StorageError(msg) => TranslationError::StorageError(wrap(msg)),
            TranslationError::SerializationError(msg) => {
                TranslationError::SerializationError(wrap(msg))
            }
            TranslationError::InternalError(msg) => TranslationError::InternalError(wrap(msg)),
        }
    }

    /// 按严重程度记录日志
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", self),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", self),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", self),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", self),
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Storage,
    Serialization,
    Internal,
}

/// 标准错误转换
impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::InternalError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::SerializationError(format!("TOML序列化错误: {}", error))
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(error: config::ConfigError) -> Self {
        TranslationError::ConfigError(format!("配置加载失败: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        TranslationError::NetworkError(format!("HTTP客户端错误: {}", error))
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

#[cfg(feature = "web")]
impl From<mongodb::error::Error> for TranslationError {
    fn from(error: mongodb::error::Error) -> Self {
        TranslationError::StorageError(format!("MongoDB错误: {}", error))
    }
}

/// 错误结果类型别名
pub type ServiceResult<T> = Result<T, TranslationError>;
