//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::env::{EnvError, EnvResult, EnvVar};

/// MongoDB 配置
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB 连接字符串
    pub connection_string: String,
    /// 数据库名称
    pub database_name: String,
    /// 集合名称
    pub collection_name: String,
}

impl MongoConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::mongodb;

        Ok(Self {
            connection_string: mongodb::ConnectionString::get()?,
            database_name: mongodb::DatabaseName::get()?,
            collection_name: mongodb::CollectionName::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        use crate::env::mongodb;

        for (variable, value) in [
            (mongodb::ConnectionString::NAME, &self.connection_string),
            (mongodb::DatabaseName::NAME, &self.database_name),
            (mongodb::CollectionName::NAME, &self.collection_name),
        ] {
            if value.trim().is_empty() {
                return Err(EnvError {
                    variable: variable.to_string(),
                    message: "Value cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("MongoDB 配置读取失败: {}，使用默认值", e);
            Self {
                connection_string: "mongodb://localhost:27017".to_string(),
                database_name: "translation-api".to_string(),
                collection_name: "translations".to_string(),
            }
        })
    }
}

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
    /// 是否记录翻译历史
    pub history_enabled: bool,
    /// MongoDB 配置，为 `None` 时历史记录保存在内存中
    pub mongo_config: Option<MongoConfig>,
}

impl WebConfig {
    /// 从环境变量创建配置
    ///
    /// 只有显式设置 `MONGODB_URI` 时才启用 MongoDB 历史存储。
    pub fn from_env() -> EnvResult<Self> {
        use crate::env::{mongodb, web};

        let mongo_config = if std::env::var(mongodb::ConnectionString::NAME).is_ok() {
            Some(MongoConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            bind_addr: web::BindAddress::get()?,
            port: web::Port::get()?,
            history_enabled: web::HistoryEnabled::get()?,
            mongo_config,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        use crate::env::web;

        if self.bind_addr.trim().is_empty() {
            return Err(EnvError {
                variable: web::BindAddress::NAME.to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: web::Port::NAME.to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if let Some(ref mongo_config) = self.mongo_config {
            mongo_config.validate()?;
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Web 配置读取失败: {}，使用默认值", e);
            Self {
                bind_addr: "127.0.0.1".to_string(),
                port: 3001,
                history_enabled: true,
                mongo_config: None,
            }
        })
    }
}
