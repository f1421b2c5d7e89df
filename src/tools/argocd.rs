//! `get_argocd_apps`: ArgoCD Application sync and health

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{list_items, str_at, Tool};
use crate::cluster::Cluster;
use crate::error::Result;

pub const NAME: &str = "get_argocd_apps";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    pub name: String,
    pub sync: String,
    pub health: String,
}

impl AppStatus {
    pub fn from_item(app: &Value) -> Self {
        let field = |path: &[&str]| str_at(app, path).unwrap_or("Unknown").to_string();
        Self {
            name: str_at(app, &["metadata", "name"])
                .unwrap_or("unknown")
                .to_string(),
            sync: field(&["status", "sync", "status"]),
            health: field(&["status", "health", "status"]),
        }
    }
}

/// `synced + out_of_sync == total`; apps neither Healthy nor Degraded count toward neither
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgoSummary {
    pub total: usize,
    pub synced: usize,
    pub out_of_sync: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub apps: Vec<AppStatus>,
}

pub fn summarize_apps(raw: &Value) -> ArgoSummary {
    let mut summary = ArgoSummary::default();
    for item in list_items(raw) {
        let app = AppStatus::from_item(item);
        summary.total += 1;

        if app.sync == "Synced" {
            summary.synced += 1;
        } else {
            summary.out_of_sync += 1;
        }

        match app.health.as_str() {
            "Healthy" => summary.healthy += 1,
            "Degraded" => summary.degraded += 1,
            _ => {}
        }

        summary.apps.push(app);
    }
    summary
}

pub async fn get_apps(cluster: &Cluster) -> Result<ArgoSummary> {
    let namespace = cluster.config().argocd_namespace.clone();
    let output = cluster
        .kubectl(["get", "applications", "-n", namespace.as_str(), "-o", "json"])
        .await
        .map_err(|e| e.context("Error getting ArgoCD apps"))?;
    Ok(summarize_apps(&output.into_value()))
}

pub struct ArgoAppsTool;

#[async_trait]
impl Tool for ArgoAppsTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get status of all ArgoCD applications"
    }

    fn input_schema(&self) -> &'static str {
        r#"{"type": "object", "properties": {}}"#
    }

    async fn call(&self, cluster: &Cluster, _arguments: Value) -> Result<Value> {
        let summary = get_apps(cluster).await?;
        Ok(serde_json::to_value(summary)?)
    }
}
