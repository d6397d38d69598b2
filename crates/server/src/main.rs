//! Productboard MCP server.
//!
//! Serves the Productboard tools over MCP streamable HTTP (`/mcp`, plus a plain `/health` probe)
//! or over stdio.

mod config;
mod error;
mod handler;

use anyhow::Context as _;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser as _;
use config::{Cli, DEFAULT_LOG_LEVEL, LogFormat, ServerConfig, Transport};
use handler::ProductboardServer;
use productboard_mcp_tools::catalog;
use productboard_mcp_tools::runtime::ProductboardToolSource;
use rmcp::ServiceExt as _;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use serde_json::Value;
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = ServerConfig::resolve(&cli).context("resolve configuration")?;
    info!(
        base_url = %config.api.base_url,
        api_version = %config.api.api_version,
        timeout_ms = u64::try_from(config.api.timeout.as_millis()).unwrap_or(u64::MAX),
        "configuration resolved"
    );

    let source =
        ProductboardToolSource::new(config.api.clone()).context("build Productboard tool source")?;
    let server = ProductboardServer::new(source);

    match config.transport {
        Transport::Http => serve_http(server, config.bind).await,
        Transport::Stdio => serve_stdio(server).await,
    }
}

/// Logs go to stderr so the stdio transport keeps stdout for protocol traffic.
fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let directive = cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let filter = EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log filter '{directive}'"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn serve_http(server: ProductboardServer, bind: SocketAddr) -> anyhow::Result<()> {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let app = Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    let local_addr = listener.local_addr().context("read bound address")?;
    info!(bind = %local_addr, transport = "http", "Productboard MCP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;

    info!("server stopped");
    Ok(())
}

async fn serve_stdio(server: ProductboardServer) -> anyhow::Result<()> {
    info!(transport = "stdio", "Productboard MCP server starting");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("start stdio transport")?;
    let reason = service.waiting().await.context("stdio service task failed")?;
    info!(?reason, "stdio session ended");
    Ok(())
}

async fn health() -> Json<Value> {
    Json(catalog::health_report().to_value())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
