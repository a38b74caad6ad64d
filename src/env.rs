//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置管理器和 Web 配置都从这里读取覆盖值

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "TRANSLINK_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译编排相关环境变量
pub mod translation {
    use super::*;
    use crate::translation::providers::ProviderKind;

    /// 单次请求允许的最大文本长度
    pub struct MaxTextLength;
    impl EnvVar<usize> for MaxTextLength {
        const NAME: &'static str = "TRANSLINK_MAX_TEXT_LENGTH";
        const DEFAULT: Option<usize> = Some(5000);
        const DESCRIPTION: &'static str = "Maximum characters accepted per translation request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }

    /// 批量翻译的最大条目数
    pub struct MaxBatchSize;
    impl EnvVar<usize> for MaxBatchSize {
        const NAME: &'static str = "TRANSLINK_MAX_BATCH_SIZE";
        const DEFAULT: Option<usize> = Some(10);
        const DESCRIPTION: &'static str = "Maximum requests per batch translation call";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100)
        }
    }

    /// 提供方尝试顺序
    pub struct Providers;
    impl EnvVar<Vec<ProviderKind>> for Providers {
        const NAME: &'static str = "TRANSLINK_PROVIDERS";
        const DEFAULT: Option<Vec<ProviderKind>> = None;
        const DESCRIPTION: &'static str =
            "Comma-separated provider order (gemini, libretranslate, mymemory)";

        fn parse(value: &str) -> EnvResult<Vec<ProviderKind>> {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<ProviderKind>().map_err(|e| EnvError {
                        variable: Self::NAME.to_string(),
                        message: e.to_string(),
                    })
                })
                .collect()
        }
    }
}

/// Gemini 相关环境变量
pub mod gemini {
    use super::*;

    /// API 密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "GEMINI_API_KEY";
        const DEFAULT: Option<String> = None; // 未设置时跳过 Gemini
        const DESCRIPTION: &'static str = "Google Gemini API key";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API key cannot be empty".to_string(),
                });
            }
            Ok(key.to_string())
        }
    }

    /// 模型名称
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "GEMINI_MODEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Gemini model used for generateContent";

        fn parse(value: &str) -> EnvResult<String> {
            let model = value.trim();
            if model.is_empty() || model.contains('/') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Model must be a bare name such as gemini-2.5-flash".to_string(),
                });
            }
            Ok(model.to_string())
        }
    }

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "GEMINI_TIMEOUT_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(15));
        const DESCRIPTION: &'static str = "Gemini request timeout in milliseconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_millis(value, Self::NAME, 60_000)
        }
    }
}

/// 免费 REST 翻译服务相关环境变量
pub mod rest {
    use super::*;

    /// LibreTranslate 服务地址
    pub struct LibreTranslateUrl;
    impl EnvVar<String> for LibreTranslateUrl {
        const NAME: &'static str = "LIBRETRANSLATE_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "LibreTranslate base URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// LibreTranslate API 密钥（可选）
    pub struct LibreTranslateApiKey;
    impl EnvVar<String> for LibreTranslateApiKey {
        const NAME: &'static str = "LIBRETRANSLATE_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "LibreTranslate API key (optional)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// MyMemory 服务地址
    pub struct MyMemoryUrl;
    impl EnvVar<String> for MyMemoryUrl {
        const NAME: &'static str = "MYMEMORY_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "MyMemory base URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_http_url(value, Self::NAME)
        }
    }

    /// MyMemory 联系邮箱，可提高免费额度
    pub struct MyMemoryEmail;
    impl EnvVar<String> for MyMemoryEmail {
        const NAME: &'static str = "MYMEMORY_EMAIL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Contact email sent to MyMemory (raises the free quota)";

        fn parse(value: &str) -> EnvResult<String> {
            let email = value.trim();
            if !email.contains('@') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Must be an email address".to_string(),
                });
            }
            Ok(email.to_string())
        }
    }

    /// REST 请求超时，不超过 5 秒
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "TRANSLINK_REST_TIMEOUT_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(5));
        const DESCRIPTION: &'static str = "REST provider timeout in milliseconds (max 5000)";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_millis(value, Self::NAME, 5_000)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "TRANSLINK_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable the in-memory result cache";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "TRANSLINK_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(3600));
        const DESCRIPTION: &'static str = "Cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL must be greater than 0".to_string(),
                });
            }

            if seconds > 86400 * 7 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too long (maximum 7 days)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "TRANSLINK_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "PORT";
        const DEFAULT: Option<u16> = Some(3001);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }

    /// 是否持久化翻译历史
    pub struct HistoryEnabled;
    impl EnvVar<bool> for HistoryEnabled {
        const NAME: &'static str = "TRANSLINK_HISTORY_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Record served translations in the history store";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// MongoDB相关环境变量
pub mod mongodb {
    use super::*;

    /// MongoDB连接字符串
    pub struct ConnectionString;
    impl EnvVar<String> for ConnectionString {
        const NAME: &'static str = "MONGODB_URI";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("mongodb://localhost:27017".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB connection string";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "MongoDB URL must start with mongodb:// or mongodb+srv://"
                        .to_string(),
                })
            }
        }
    }

    /// 数据库名称
    pub struct DatabaseName;
    impl EnvVar<String> for DatabaseName {
        const NAME: &'static str = "MONGODB_DATABASE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("translation-api".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB database name";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 集合名称
    pub struct CollectionName;
    impl EnvVar<String> for CollectionName {
        const NAME: &'static str = "MONGODB_COLLECTION";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("translations".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "MongoDB collection name";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_millis(value: &str, var_name: &str, max_ms: u64) -> EnvResult<Duration> {
    let millis: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of milliseconds".to_string(),
    })?;

    if millis == 0 || millis > max_ms {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Timeout must be between 1 and {} ms", max_ms),
        });
    }

    Ok(Duration::from_millis(millis))
}

fn parse_http_url(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| EnvError {
        variable: var_name.to_string(),
        message: format!("Invalid URL: {}", e),
    })?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(trimmed.trim_end_matches('/').to_string()),
        "http" | "https" => Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must include a host".to_string(),
        }),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must start with http:// or https://".to_string(),
        }),
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(name.to_string())
}
