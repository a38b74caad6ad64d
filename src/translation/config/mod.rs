//! 翻译配置管理模块
//!
//! 支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{
    ConfigManager, GeminiConfig, LibreTranslateConfig, MyMemoryConfig, TranslationConfig,
};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 请求校验
    pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;
    pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;
    pub const AUTO_SOURCE_LANG: &str = "auto";

    // 缓存设置
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600); // 1小时
    pub const MAX_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 3600); // 7天
    /// 限流占位译文的缓存时间，与 429 响应提示的重试间隔一致
    pub const RATE_LIMITED_CACHE_TTL: Duration = Duration::from_secs(5);

    // Gemini
    pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_GEMINI_TIMEOUT: Duration = Duration::from_secs(15);

    // 免费 REST 服务
    pub const DEFAULT_LIBRETRANSLATE_URL: &str = "https://libretranslate.de";
    pub const DEFAULT_MYMEMORY_URL: &str = "https://api.mymemory.translated.net";
    pub const DEFAULT_REST_TIMEOUT: Duration = Duration::from_secs(5);
    pub const MAX_REST_TIMEOUT: Duration = Duration::from_secs(5);

    /// 全部提供方失败时结果的引擎名
    pub const PLACEHOLDER_ENGINE: &str = "placeholder";

    /// 支持的目标语言（代码, 英文名称）
    pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
        ("en", "English"),
        ("fr", "French"),
        ("es", "Spanish"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("zh", "Chinese"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("ar", "Arabic"),
        ("hi", "Hindi"),
    ];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "translink.toml",
        "config.toml",
        ".translink.toml",
        "~/.config/translink/config.toml",
        "/etc/translink/config.toml",
    ];
}

/// 语言代码是否在支持列表中
pub fn is_supported_language(code: &str) -> bool {
    language_name(code).is_some()
}

/// 语言代码对应的英文名称
pub fn language_name(code: &str) -> Option<&'static str> {
    constants::SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// 加载配置，失败时退回默认值
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            TranslationConfig::default()
        }
    }
}
