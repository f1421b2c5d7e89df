//! Homelab CLI
//!
//! One-shot queries from a terminal, printed as pretty JSON.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use homelab::config::ClusterArgs;
use homelab::exec::command_document;
use homelab::tools::{alerts, argocd, ceph, nodes, pods};
use homelab::{Cluster, ToolRegistry};

#[derive(Parser)]
#[command(name = "homelab")]
#[command(about = "Homelab cluster status CLI")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    cluster: ClusterArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Node readiness and kubelet versions
    Nodes,
    /// Pod phase counts
    Pods {
        /// Namespace to query (default: all namespaces)
        #[arg(short, long)]
        namespace: Option<String>,
    },
    /// ArgoCD application sync and health
    Argocd,
    /// Rook-Ceph cluster status
    Ceph,
    /// Firing Prometheus alerts
    Alerts {
        /// Filter by severity: critical, warning, info
        #[arg(short, long)]
        severity: Option<String>,
    },
    /// List available tools
    Tools,
    /// Run kubectl with the configured flags and print the raw command document
    Kubectl {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.cluster.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let registry = ToolRegistry::stdio_catalog(Cluster::from_config(config));

    let (name, arguments) = match cli.command {
        Commands::Nodes => (nodes::NAME, Value::Null),
        Commands::Pods { namespace } => (pods::NAME, json!({ "namespace": namespace })),
        Commands::Argocd => (argocd::NAME, Value::Null),
        Commands::Ceph => (ceph::NAME, Value::Null),
        Commands::Alerts { severity } => (alerts::NAME, json!({ "severity": severity })),
        Commands::Tools => {
            print_json(&json!({ "tools": registry.definitions() }));
            return ExitCode::SUCCESS;
        }
        Commands::Kubectl { args } => {
            let result = registry.cluster().kubectl(args).await;
            print_json(&command_document(&result));
            return if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    match registry.call(name, arguments).await {
        Ok(value) => {
            print_json(&value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}
