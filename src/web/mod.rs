//! Web 服务器模块
//!
//! 为翻译服务提供 HTTP 接口

pub mod config;
pub mod handlers;
pub mod history;
pub mod routes;
pub mod types;

pub use config::*;
pub use history::MongoHistoryStore;
pub use routes::*;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::translation::{
    HistoryStore, MemoryHistoryStore, ServiceResult, TranslationError, TranslationService,
};

/// 请求体大小上限
pub const MAX_BODY_BYTES: usize = 10 * 1024;

/// 过期缓存清理间隔
const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(120);

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    service: Arc<TranslationService>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, service: TranslationService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    /// 根据配置创建历史存储
    ///
    /// MongoDB 连接失败时退回内存存储，服务照常启动。
    pub async fn open_history(&self) -> Option<Arc<dyn HistoryStore>> {
        if !self.config.history_enabled {
            tracing::info!("翻译历史记录已关闭");
            return None;
        }

        if let Some(mongo_config) = &self.config.mongo_config {
            match MongoHistoryStore::connect(mongo_config).await {
                Ok(store) => return Some(Arc::new(store)),
                Err(e) => {
                    tracing::warn!("MongoDB 连接失败: {}，历史记录改为保存在内存中", e);
                }
            }
        } else {
            tracing::info!("未配置 MongoDB，历史记录保存在内存中");
        }

        Some(Arc::new(MemoryHistoryStore::new()))
    }

    /// 启动 Web 服务器
    pub async fn start(&self) -> ServiceResult<()> {
        self.config.validate()?;

        let history = self.open_history().await;
        let app_state = Arc::new(AppState::new(Arc::clone(&self.service), history));
        let app = create_router(app_state);

        spawn_cache_cleanup(Arc::clone(&self.service));

        let address = self.config.listen_address();
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| TranslationError::ConfigError(format!("无法绑定地址 {}: {}", address, e)))?;

        tracing::info!(
            "Web 服务器启动: http://{}，提供方: [{}]",
            address,
            self.service.provider_names().join(", ")
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TranslationError::InternalError(format!("服务器错误: {}", e)))?;

        Ok(())
    }
}

/// 创建路由器并挂载中间件
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    create_routes().with_state(app_state).layer(middleware)
}

fn spawn_cache_cleanup(service: Arc<TranslationService>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            service.cleanup_cache();
        }
    });
}
