//! SciQuest Heroes - 故事结构生成服务
//!
//! 使用 axum 框架构建的无状态 HTTP 服务：根据孩子提交的创意生成故事大纲。
//! 配置了 OpenAI 密钥时调用模型生成，否则使用本地确定性兜底。

use anyhow::Context;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_api_routes;
use config::load_config;
use state::create_shared_state;
use utils::mask_api_key;

/// 等待 Ctrl+C 以优雅退出
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sciquest_story=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SciQuest story structure service...");

    let config = load_config().context("failed to load configuration")?;
    if config.has_api_key() {
        info!(
            "Using OpenAI completions: base_url={}, model={}, api_key={}",
            config.base_url,
            config.model,
            mask_api_key(&config.api_key)
        );
    } else {
        info!("OPENAI_API_KEY not set, serving fallback story structures");
    }

    let state = create_shared_state(&config).context("failed to create LLM client")?;

    let app = create_api_routes(Arc::clone(&state)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Server listening on: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
