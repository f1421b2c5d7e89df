//! Homelab tools and the registry both transports dispatch through
//!
//! A [`Tool`] couples a name, a JSON schema and an async handler. A
//! [`ToolRegistry`] is built once at startup, never mutated, and shared by
//! the MCP and HTTP adapters.

pub mod alerts;
pub mod argocd;
pub mod ceph;
pub mod nodes;
pub mod pods;

use std::time::Instant;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cluster::Cluster;
use crate::error::{HomelabError, Result};

pub use alerts::PrometheusAlertsTool;
pub use argocd::ArgoAppsTool;
pub use ceph::CephStatusTool;
pub use nodes::NodesTool;
pub use pods::PodsTool;

/// MCP tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A named, schema-described homelab query
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object, as JSON source
    fn input_schema(&self) -> &'static str;

    async fn call(&self, cluster: &Cluster, arguments: Value) -> Result<Value>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: serde_json::from_str(self.input_schema()).unwrap_or(json!({})),
        }
    }
}

/// Immutable set of tools bound to one cluster
pub struct ToolRegistry {
    cluster: Cluster,
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry; add tools with [`ToolRegistry::with_tool`]
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// All five tools, served over MCP stdio
    pub fn stdio_catalog(cluster: Cluster) -> Self {
        Self::new(cluster)
            .with_tool(NodesTool)
            .with_tool(PodsTool)
            .with_tool(ArgoAppsTool)
            .with_tool(CephStatusTool)
            .with_tool(PrometheusAlertsTool)
    }

    /// HTTP exposes only the plain kubectl reads; Ceph exec and the curl
    /// helper pod stay stdio-only.
    pub fn http_catalog(cluster: Cluster) -> Self {
        Self::new(cluster)
            .with_tool(NodesTool)
            .with_tool(PodsTool)
            .with_tool(ArgoAppsTool)
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    /// Run a tool by name
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| HomelabError::UnknownTool(name.to_string()))?;

        let started = Instant::now();
        let result = tool.call(&self.cluster, arguments).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(tool = name, elapsed_ms, "tool call succeeded"),
            Err(e) => tracing::warn!(tool = name, elapsed_ms, error = %e, "tool call failed"),
        }
        result
    }
}

/// Deserialize a tool's arguments; a missing or null arguments object means defaults
pub(crate) fn parse_arguments<T>(arguments: Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments).map_err(|e| HomelabError::InvalidInput(e.to_string()))
}

/// The `items` array of a Kubernetes list response, or nothing
pub(crate) fn list_items(raw: &Value) -> &[Value] {
    raw.get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Follow a path of object keys down to a string
pub(crate) fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
}

/// Treat an empty or whitespace-only string argument as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
