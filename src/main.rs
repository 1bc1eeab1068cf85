// ==========================================
// 作业合规运营洞察系统 - HTTP 服务入口
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use ops_intel::app::{build_router, get_default_db_path, AppState};
use ops_intel::config::ServerConfig;
use ops_intel::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==========================================");
    tracing::info!("{} - v{}", ops_intel::APP_NAME, ops_intel::VERSION);
    tracing::info!("==========================================");

    let config = ServerConfig::from_env(get_default_db_path());
    i18n::set_locale(&config.locale);
    tracing::info!(
        bind = %config.bind_addr,
        db_path = %config.db_path,
        locale = %config.locale,
        "服务配置已加载"
    );

    // 初始化应用状态
    let state = AppState::from_config(&config)
        .map_err(|e| anyhow::anyhow!(e))
        .context("应用状态初始化失败")?;

    let app = build_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法监听地址 {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "HTTP 服务已启动");

    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;
    Ok(())
}
