//! `get_ceph_status`: `ceph status` run inside the Rook toolbox pod

use async_trait::async_trait;
use serde_json::Value;

use super::Tool;
use crate::cluster::Cluster;
use crate::error::{HomelabError, Result};

pub const NAME: &str = "get_ceph_status";

const POD_NAME_JSONPATH: &str = "jsonpath={.items[0].metadata.name}";

/// Resolve the name of the Rook-Ceph tools pod
pub async fn find_tools_pod(cluster: &Cluster) -> Result<String> {
    let config = cluster.config();
    let lookup = cluster
        .kubectl_stdout([
            "get",
            "pod",
            "-n",
            config.ceph_namespace.as_str(),
            "-l",
            config.ceph_tools_selector.as_str(),
            "-o",
            POD_NAME_JSONPATH,
        ])
        .await;

    let name = match lookup {
        Ok(stdout) => stdout.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "rook-ceph-tools pod lookup failed");
            String::new()
        }
    };

    if name.is_empty() {
        return Err(HomelabError::ToolsPodNotFound);
    }
    Ok(name)
}

/// `ceph status -f json`, returned as-is
pub async fn get_ceph_status(cluster: &Cluster) -> Result<Value> {
    let pod = find_tools_pod(cluster).await?;
    tracing::debug!(pod = %pod, "using rook-ceph-tools pod");

    let output = cluster
        .kubectl([
            "exec",
            "-n",
            cluster.config().ceph_namespace.as_str(),
            pod.as_str(),
            "--",
            "ceph",
            "status",
            "-f",
            "json",
        ])
        .await
        .map_err(|e| e.context("Error getting Ceph status"))?;
    Ok(output.into_value())
}

pub struct CephStatusTool;

#[async_trait]
impl Tool for CephStatusTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get Rook-Ceph cluster health and status"
    }

    fn input_schema(&self) -> &'static str {
        r#"{"type": "object", "properties": {}}"#
    }

    async fn call(&self, cluster: &Cluster, _arguments: Value) -> Result<Value> {
        get_ceph_status(cluster).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;
    use crate::exec::ScriptedRunner;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn cluster(runner: &Arc<ScriptedRunner>) -> Cluster {
        Cluster::new(runner.clone(), ClusterConfig::default())
    }

    #[tokio::test]
    async fn test_two_step_exec() {
        let status = json!({"health": {"status": "HEALTH_OK"}, "fsid": "abc"});
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_text("rook-ceph-tools-7d9f8b-xk2lp\n")
                .with_json(status.clone()),
        );

        let value = get_ceph_status(&cluster(&runner)).await.unwrap();
        assert_eq!(value, status);

        let calls = runner.calls();
        assert_eq!(
            calls[0],
            vec![
                "kubectl",
                "get",
                "pod",
                "-n",
                "rook-ceph",
                "-l",
                "app=rook-ceph-tools",
                "-o",
                "jsonpath={.items[0].metadata.name}"
            ]
        );
        assert_eq!(
            calls[1],
            vec![
                "kubectl",
                "exec",
                "-n",
                "rook-ceph",
                "rook-ceph-tools-7d9f8b-xk2lp",
                "--",
                "ceph",
                "status",
                "-f",
                "json"
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_lookup_is_not_found() {
        let runner = Arc::new(ScriptedRunner::new().with_text("  \n"));
        let err = get_ceph_status(&cluster(&runner)).await.unwrap_err();
        assert!(matches!(err, HomelabError::ToolsPodNotFound));
        assert_eq!(err.to_string(), "Error: Could not find rook-ceph-tools pod");
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_pod_name_is_taken_verbatim() {
        for name in ["null", "true", "1e5"] {
            let runner = Arc::new(
                ScriptedRunner::new()
                    .with_text(name)
                    .with_json(json!({"health": {"status": "HEALTH_OK"}})),
            );
            assert_eq!(find_tools_pod(&cluster(&runner)).await.unwrap(), name);
        }
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_found() {
        let runner = Arc::new(ScriptedRunner::new().with_failure("forbidden", 1));
        let err = get_ceph_status(&cluster(&runner)).await.unwrap_err();
        assert!(matches!(err, HomelabError::ToolsPodNotFound));
    }

    #[tokio::test]
    async fn test_exec_failure_context() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .with_text("rook-ceph-tools-1")
                .with_failure("container not found", 1),
        );
        let err = get_ceph_status(&cluster(&runner)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error getting Ceph status: container not found"
        );
    }
}
