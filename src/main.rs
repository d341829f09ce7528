//! render-gateway - serve `POST /render` against the trusted package origin.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use render_gateway::config::ServerConfig;
use render_gateway::logging::init_tracing;
use render_gateway::server::handler::RenderServer;
use render_gateway::source::http_source::OriginFetcher;
use render_gateway::source::origin::Origin;

/// Fetch and assemble JS packages for server-side rendering
#[derive(Parser)]
#[command(name = "render-gateway")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "RENDER_GATEWAY_LISTEN")]
    listen: Option<SocketAddr>,

    /// Per-package fetch timeout in seconds (0 disables the timeout)
    #[arg(long, env = "RENDER_GATEWAY_FETCH_TIMEOUT_SECS", default_value_t = 0)]
    fetch_timeout_secs: u64,

    /// Log filter directives, e.g. `debug` or `render_gateway=trace` (overrides RUST_LOG)
    #[arg(long, env = "RENDER_GATEWAY_LOG")]
    log_filter: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            listen: self.listen.unwrap_or(defaults.listen),
            fetch_timeout: (self.fetch_timeout_secs > 0)
                .then(|| Duration::from_secs(self.fetch_timeout_secs)),
            log_filter: self.log_filter,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config();
    init_tracing(config.log_filter.as_deref());

    let origin = Origin::trusted().context("trusted origin is invalid")?;
    info!(
        "fetching packages from {} (fetch timeout: {:?})",
        origin, config.fetch_timeout
    );
    let fetcher = OriginFetcher::new(origin, config.fetch_timeout)?;

    let server = RenderServer::start(config.listen, Arc::new(fetcher))
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    server.shutdown().await;
    Ok(())
}
