//! Homelab HTTP API
//!
//! Run with: homelab-http --port 8080

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homelab::config::ClusterArgs;
use homelab::error::Result;
use homelab::http::{HttpServer, DEFAULT_HTTP_PORT};
use homelab::{Cluster, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "homelab-http")]
#[command(about = "HTTP JSON API for homelab cluster status queries")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOMELAB_HTTP_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "HOMELAB_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Emit logs as JSON
    #[arg(long, env = "HOMELAB_LOG_JSON")]
    log_json: bool,

    #[command(flatten)]
    cluster: ClusterArgs,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));

    if json {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    let config = args.cluster.into_config()?;
    let registry = Arc::new(ToolRegistry::http_catalog(Cluster::from_config(config)));
    tracing::info!(tools = ?registry.names(), "Homelab HTTP API starting...");

    let addr = SocketAddr::new(args.host, args.port);
    HttpServer::new(registry, addr).start().await?;

    Ok(())
}
