//! homelab-mcp - read-only homelab infrastructure queries
//!
//! Kubernetes node and pod status, ArgoCD applications, Rook-Ceph health
//! and Prometheus alerts, gathered by shelling out to `kubectl` and served
//! over MCP stdio or a small HTTP JSON API.

pub mod cluster;
pub mod config;
pub mod error;
pub mod exec;
pub mod http;
pub mod mcp;
pub mod tools;

pub use cluster::Cluster;
pub use config::{ClusterArgs, ClusterConfig};
pub use error::{HomelabError, Result};
pub use tools::{Tool, ToolDefinition, ToolRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
