//! Web 服务器主程序入口

use clap::Parser;
use tracing_subscriber::EnvFilter;

use translink::env::{core::LogLevel, EnvVar};
use translink::translation::{ConfigManager, TranslationService};
use translink::web::{WebConfig, WebServer};

/// 多提供方翻译服务
#[derive(Debug, Parser)]
#[command(name = "translink-web", version, about)]
struct Args {
    /// 绑定地址，默认读取 TRANSLINK_BIND_ADDRESS
    #[arg(short, long)]
    bind: Option<String>,

    /// 端口，默认读取 PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// 配置文件路径，不指定时按默认搜索路径查找
    #[arg(short, long)]
    config: Option<String>,

    /// 不记录翻译历史
    #[arg(long)]
    no_history: bool,

    /// 生成示例配置文件后退出
    #[arg(long, value_name = "PATH")]
    generate_config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(LogLevel::get_or_default("info".to_string()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(path) = args.generate_config {
        ConfigManager::generate_example_config(&path)?;
        println!("示例配置已写入 {}", path);
        return Ok(());
    }

    let manager = match args.config.as_deref() {
        Some(path) => ConfigManager::from_path(path)?,
        None => ConfigManager::new()?,
    };
    let service = TranslationService::new(manager.into_config())?;

    let mut web_config = WebConfig::default();
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    if args.no_history {
        web_config.history_enabled = false;
    }

    let server = WebServer::new(web_config, service);
    server.start().await?;

    Ok(())
}
