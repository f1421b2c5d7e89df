//! `get_k8s_pods`: pod phase tallies, one namespace or all

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{list_items, non_empty, parse_arguments, str_at, Tool};
use crate::cluster::Cluster;
use crate::error::Result;

pub const NAME: &str = "get_k8s_pods";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodsArgs {
    /// Specific namespace; absent or empty means all namespaces
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Pods per phase bucket. The buckets always sum to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodCounts {
    pub total: usize,
    pub running: usize,
    pub pending: usize,
    pub failed: usize,
    pub unknown: usize,
}

impl PodCounts {
    /// Count one pod by its `status.phase`
    pub fn record(&mut self, phase: Option<&str>) {
        self.total += 1;
        match phase {
            Some("Running") => self.running += 1,
            Some("Pending") => self.pending += 1,
            Some("Failed") => self.failed += 1,
            _ => self.unknown += 1,
        }
    }
}

pub fn count_pod_phases(pods: &[Value]) -> PodCounts {
    pods.iter().fold(PodCounts::default(), |mut counts, pod| {
        counts.record(str_at(pod, &["status", "phase"]));
        counts
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodSummary {
    pub summary: PodCounts,
    pub raw: Value,
}

pub fn summarize_pods(raw: Value) -> PodSummary {
    PodSummary {
        summary: count_pod_phases(list_items(&raw)),
        raw,
    }
}

/// kubectl arguments for a pod listing
pub fn pods_args(namespace: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = ["get", "pods", "-o", "json"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    match namespace {
        Some(ns) => {
            args.push("-n".to_string());
            args.push(ns.to_string());
        }
        None => args.push("--all-namespaces".to_string()),
    }
    args
}

pub async fn get_pods(cluster: &Cluster, namespace: Option<&str>) -> Result<PodSummary> {
    let output = cluster
        .kubectl(pods_args(namespace))
        .await
        .map_err(|e| e.context("Error getting pods"))?;
    Ok(summarize_pods(output.into_value()))
}

pub struct PodsTool;

#[async_trait]
impl Tool for PodsTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "List all pods across all namespaces with their status"
    }

    fn input_schema(&self) -> &'static str {
        r#"{
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Specific namespace to query (default: all namespaces)"}
            }
        }"#
    }

    async fn call(&self, cluster: &Cluster, arguments: Value) -> Result<Value> {
        let args: PodsArgs = parse_arguments(arguments)?;
        let namespace = non_empty(args.namespace);
        let summary = get_pods(cluster, namespace.as_deref()).await?;
        Ok(serde_json::to_value(summary)?)
    }
}
