//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值。
//! 加载顺序：`.env` 文件 → 第一个存在的配置文件 → 环境变量覆盖 → 验证。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::EnvVar;
use crate::translation::error::{ServiceResult, TranslationError};
use crate::translation::providers::ProviderKind;

/// Gemini 提供方配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// 未配置密钥时不会加入提供方链
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: constants::DEFAULT_GEMINI_MODEL.to_string(),
            base_url: constants::DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_ms: constants::DEFAULT_GEMINI_TIMEOUT.as_millis() as u64,
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// LibreTranslate 提供方配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibreTranslateConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_LIBRETRANSLATE_URL.to_string(),
            api_key: None,
            timeout_ms: constants::DEFAULT_REST_TIMEOUT.as_millis() as u64,
        }
    }
}

impl LibreTranslateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// MyMemory 提供方配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MyMemoryConfig {
    pub url: String,
    pub email: Option<String>,
    pub timeout_ms: u64,
}

impl Default for MyMemoryConfig {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_MYMEMORY_URL.to_string(),
            email: None,
            timeout_ms: constants::DEFAULT_REST_TIMEOUT.as_millis() as u64,
        }
    }
}

impl MyMemoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 翻译服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    // 请求校验
    pub max_text_length: usize,
    pub max_batch_size: usize,

    /// 提供方尝试顺序，第一个为主提供方
    pub providers: Vec<ProviderKind>,

    // 缓存配置
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,

    // 提供方配置
    pub gemini: GeminiConfig,
    pub libretranslate: LibreTranslateConfig,
    pub mymemory: MyMemoryConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_text_length: constants::DEFAULT_MAX_TEXT_LENGTH,
            max_batch_size: constants::DEFAULT_MAX_BATCH_SIZE,
            providers: vec![
                ProviderKind::Gemini,
                ProviderKind::LibreTranslate,
                ProviderKind::MyMemory,
            ],
            cache_enabled: true,
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL.as_secs(),
            gemini: GeminiConfig::default(),
            libretranslate: LibreTranslateConfig::default(),
            mymemory: MyMemoryConfig::default(),
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> ServiceResult<()> {
        if self.max_text_length == 0 {
            return Err(TranslationError::ConfigError(
                "最大文本长度不能为0".to_string(),
            ));
        }

        if self.max_batch_size == 0 {
            return Err(TranslationError::ConfigError("批量大小不能为0".to_string()));
        }

        if self.cache_enabled && self.cache_ttl_secs == 0 {
            return Err(TranslationError::ConfigError(
                "启用缓存时TTL不能为0".to_string(),
            ));
        }

        if self.cache_ttl_secs > constants::MAX_CACHE_TTL.as_secs() {
            return Err(TranslationError::ConfigError(format!(
                "缓存TTL不能超过 {} 秒",
                constants::MAX_CACHE_TTL.as_secs()
            )));
        }

        if self.gemini.timeout_ms == 0 {
            return Err(TranslationError::ConfigError(
                "Gemini 超时不能为0".to_string(),
            ));
        }

        let rest_max = constants::MAX_REST_TIMEOUT.as_millis() as u64;
        for (name, timeout_ms) in [
            ("libretranslate", self.libretranslate.timeout_ms),
            ("mymemory", self.mymemory.timeout_ms),
        ] {
            if timeout_ms == 0 || timeout_ms > rest_max {
                return Err(TranslationError::ConfigError(format!(
                    "{} 超时必须在 1..={} 毫秒之间",
                    name, rest_max
                )));
            }
        }

        for (name, endpoint) in [
            ("gemini", &self.gemini.base_url),
            ("libretranslate", &self.libretranslate.url),
            ("mymemory", &self.mymemory.url),
        ] {
            url::Url::parse(endpoint).map_err(|e| {
                TranslationError::ConfigError(format!("{} 地址无效 '{}': {}", name, endpoint, e))
            })?;
        }

        if self.providers.is_empty() {
            tracing::warn!("未配置任何翻译提供方，所有请求都将返回占位译文");
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    ///
    /// 只有显式设置的变量才会覆盖配置文件中的值。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{cache, gemini, rest, translation};

        if let Some(max_len) = env_override::<_, translation::MaxTextLength>() {
            self.max_text_length = max_len;
        }

        if let Some(max_batch) = env_override::<_, translation::MaxBatchSize>() {
            self.max_batch_size = max_batch;
        }

        if let Some(order) = env_override::<_, translation::Providers>() {
            tracing::info!("环境变量覆盖提供方顺序: {:?}", order);
            self.providers = order;
        }

        if let Some(key) = env_override::<_, gemini::ApiKey>() {
            self.gemini.api_key = Some(key);
        }

        if let Some(model) = env_override::<_, gemini::Model>() {
            self.gemini.model = model;
        }

        if let Some(timeout) = env_override::<_, gemini::Timeout>() {
            self.gemini.timeout_ms = timeout.as_millis() as u64;
        }

        if let Some(url) = env_override::<_, rest::LibreTranslateUrl>() {
            self.libretranslate.url = url;
        }

        if let Some(key) = env_override::<_, rest::LibreTranslateApiKey>() {
            self.libretranslate.api_key = Some(key).filter(|k| !k.is_empty());
        }

        if let Some(url) = env_override::<_, rest::MyMemoryUrl>() {
            self.mymemory.url = url;
        }

        if let Some(email) = env_override::<_, rest::MyMemoryEmail>() {
            self.mymemory.email = Some(email);
        }

        if let Some(timeout) = env_override::<_, rest::Timeout>() {
            let millis = timeout.as_millis() as u64;
            self.libretranslate.timeout_ms = millis;
            self.mymemory.timeout_ms = millis;
        }

        if let Some(cache_enabled) = env_override::<_, cache::Enabled>() {
            self.cache_enabled = cache_enabled;
        }

        if let Some(cache_ttl) = env_override::<_, cache::Ttl>() {
            self.cache_ttl_secs = cache_ttl.as_secs();
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// 读取显式设置的环境变量，解析失败时记录警告并忽略
fn env_override<T, V: EnvVar<T>>() -> Option<T> {
    if std::env::var(V::NAME).is_err() {
        return None;
    }
    match V::get() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("忽略无效的环境变量: {}", e);
            None
        }
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器，按搜索路径查找配置文件
    pub fn new() -> ServiceResult<Self> {
        Self::load_dotenv();
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 从指定文件创建配置管理器
    pub fn from_path(path: &str) -> ServiceResult<Self> {
        Self::load_dotenv();
        let expanded = shellexpand::tilde(path);
        if !Path::new(expanded.as_ref()).exists() {
            return Err(TranslationError::ConfigError(format!(
                "配置文件不存在: {}",
                expanded
            )));
        }
        let config = Self::load_from_file(&expanded)?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> ServiceResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 从文件加载配置
    fn load_config() -> ServiceResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置，格式由扩展名决定（TOML / JSON / YAML）
    pub fn load_from_file(path: &str) -> ServiceResult<TranslationConfig> {
        let settings = config::Config::builder()
            .add_source(config::File::from(Path::new(path)))
            .build()
            .map_err(|e| TranslationError::from(e).with_context(path))?;

        settings
            .try_deserialize::<TranslationConfig>()
            .map_err(|e| TranslationError::from(e).with_context(path))
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env.development", ".env.production", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> ServiceResult<()> {
        let content = toml::to_string_pretty(&TranslationConfig::default())?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TranslationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.providers.first(), Some(&ProviderKind::Gemini));
        assert_eq!(config.libretranslate.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_validation_rejects_slow_rest_timeout() {
        let mut config = TranslationConfig::default();
        config.mymemory.timeout_ms = 30_000;
        assert!(matches!(
            config.validate(),
            Err(TranslationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_excessive_cache_ttl() {
        let mut config = TranslationConfig::default();
        config.cache_ttl_secs = constants::MAX_CACHE_TTL.as_secs() + 1;
        assert!(config.validate().is_err());

        config.cache_ttl_secs = constants::MAX_CACHE_TTL.as_secs();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let mut config = TranslationConfig::default();
        config.libretranslate.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("translink-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
max_text_length = 1000
providers = ["libretranslate"]
cache_ttl_secs = 60

[libretranslate]
url = "http://localhost:5000"
"#,
        )
        .unwrap();

        let config = ConfigManager::load_from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.max_text_length, 1000);
        assert_eq!(config.providers, vec![ProviderKind::LibreTranslate]);
        assert_eq!(config.libretranslate.url, "http://localhost:5000");
        // 未出现的字段使用默认值
        assert_eq!(config.libretranslate.timeout_ms, 5000);
        assert_eq!(config.gemini.model, constants::DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_example_config_round_trips_through_loader() {
        let path = std::env::temp_dir().join(format!("translink-example-{}.toml", std::process::id()));
        let path_str = path.to_str().unwrap();

        ConfigManager::generate_example_config(path_str).unwrap();
        let loaded = ConfigManager::load_from_file(path_str).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.max_batch_size, constants::DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(loaded.providers.len(), 3);
    }
}
