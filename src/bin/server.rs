//! Homelab MCP Server
//!
//! Run with: homelab-mcp

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homelab::config::ClusterArgs;
use homelab::error::Result;
use homelab::mcp::{HomelabHandler, McpServer};
use homelab::{Cluster, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "homelab-mcp")]
#[command(about = "Homelab MCP server for cluster status queries")]
#[command(version)]
struct Args {
    #[command(flatten)]
    cluster: ClusterArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.cluster.into_config()?;

    let registry = Arc::new(ToolRegistry::stdio_catalog(Cluster::from_config(config)));
    tracing::info!(tools = ?registry.names(), "Homelab MCP server starting...");

    let server = McpServer::new(HomelabHandler::new(registry));
    server.run().await?;

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
