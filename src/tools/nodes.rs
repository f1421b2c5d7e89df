//! `get_k8s_nodes`: node readiness and kubelet versions

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{list_items, str_at, Tool};
use crate::cluster::Cluster;
use crate::error::Result;

pub const NAME: &str = "get_k8s_nodes";

/// Readiness derived from a node's `Ready` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeReadiness {
    Ready,
    NotReady,
    Unknown,
}

impl fmt::Display for NodeReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeReadiness::Ready => "Ready",
            NodeReadiness::NotReady => "NotReady",
            NodeReadiness::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Classify a node. The last `Ready`-typed condition wins.
pub fn node_readiness(node: &Value) -> NodeReadiness {
    node.get("status")
        .and_then(|s| s.get("conditions"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|c| c.get("type").and_then(Value::as_str) == Some("Ready"))
        .last()
        .map(|c| match c.get("status").and_then(Value::as_str) {
            Some("True") => NodeReadiness::Ready,
            _ => NodeReadiness::NotReady,
        })
        .unwrap_or(NodeReadiness::Unknown)
}

/// One display line per node: `name: Ready (v1.29.0)`
pub fn node_line(node: &Value) -> String {
    let name = str_at(node, &["metadata", "name"]).unwrap_or("unknown");
    let version = match str_at(node, &["status", "nodeInfo", "kubeletVersion"]) {
        Some(v) => format!("v{}", v.trim_start_matches('v')),
        None => "unknown".to_string(),
    };
    format!("{}: {} ({})", name, node_readiness(node), version)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub summary: String,
    pub count: usize,
    pub nodes: Vec<String>,
    pub raw: Value,
}

pub fn summarize_nodes(raw: Value) -> NodeSummary {
    let nodes: Vec<String> = list_items(&raw).iter().map(node_line).collect();
    NodeSummary {
        summary: format!("{} nodes total", nodes.len()),
        count: nodes.len(),
        nodes,
        raw,
    }
}

pub async fn get_nodes(cluster: &Cluster) -> Result<NodeSummary> {
    let output = cluster
        .kubectl(["get", "nodes", "-o", "json"])
        .await
        .map_err(|e| e.context("Error getting nodes"))?;
    Ok(summarize_nodes(output.into_value()))
}

pub struct NodesTool;

#[async_trait]
impl Tool for NodesTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get status of all Kubernetes nodes in the cluster"
    }

    fn input_schema(&self) -> &'static str {
        r#"{"type": "object", "properties": {}}"#
    }

    async fn call(&self, cluster: &Cluster, _arguments: Value) -> Result<Value> {
        let summary = get_nodes(cluster).await?;
        Ok(serde_json::to_value(summary)?)
    }
}
