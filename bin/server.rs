// Blog Listings - Web Server

use anyhow::{Context, Result};
use blog_listings::{api, init_tracing, Dataset};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Server configuration, from flags or environment.
#[derive(Parser, Debug)]
#[command(name = "blog-server", version, about = "Read-only HTTP API over the listings dataset")]
struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// HTTP port
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// JSON or CSV dataset; the bundled dataset is used when omitted
    #[arg(long, env = "BLOGS_DATA")]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info,tower_http=debug")?;

    let config = ServerConfig::parse();

    let dataset = Dataset::load(config.data.as_deref())?;
    let app = api::router(Arc::new(dataset));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Server listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
