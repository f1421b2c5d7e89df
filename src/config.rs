//! Cluster and runner configuration
//!
//! Every value defaults to the homelab's fixed layout; flags and env vars
//! exist so the same binaries work against a different kubeconfig or a
//! renamed namespace.

use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{HomelabError, Result};

pub const DEFAULT_KUBECTL: &str = "kubectl";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_ARGOCD_NAMESPACE: &str = "argocd";
pub const DEFAULT_CEPH_NAMESPACE: &str = "rook-ceph";
pub const DEFAULT_CEPH_TOOLS_SELECTOR: &str = "app=rook-ceph-tools";
pub const DEFAULT_PROMETHEUS_URL: &str = "http://kube-prometheus-stack-prometheus.monitoring:9090";
pub const DEFAULT_CURL_IMAGE: &str = "curlimages/curl:latest";

/// Alerts returned per call
pub const MAX_ALERTS: usize = 10;

/// Resolved configuration shared by every query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub kubectl: String,
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
    pub command_timeout_secs: u64,
    pub max_output_bytes: usize,
    pub argocd_namespace: String,
    pub ceph_namespace: String,
    pub ceph_tools_selector: String,
    pub prometheus_url: String,
    pub curl_image: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kubectl: DEFAULT_KUBECTL.to_string(),
            kubeconfig: None,
            context: None,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            argocd_namespace: DEFAULT_ARGOCD_NAMESPACE.to_string(),
            ceph_namespace: DEFAULT_CEPH_NAMESPACE.to_string(),
            ceph_tools_selector: DEFAULT_CEPH_TOOLS_SELECTOR.to_string(),
            prometheus_url: DEFAULT_PROMETHEUS_URL.to_string(),
            curl_image: DEFAULT_CURL_IMAGE.to_string(),
        }
    }
}

impl ClusterConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Full URL of the Prometheus alerts endpoint
    pub fn alerts_url(&self) -> String {
        format!("{}/api/v1/alerts", self.prometheus_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        if self.kubectl.trim().is_empty() {
            return Err(HomelabError::Config("kubectl path is empty".to_string()));
        }
        if self.command_timeout_secs == 0 {
            return Err(HomelabError::Config(
                "command timeout must be at least 1 second".to_string(),
            ));
        }
        if self.max_output_bytes == 0 {
            return Err(HomelabError::Config(
                "max output bytes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cluster flags shared by every binary
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// kubectl binary to invoke
    #[arg(long, env = "HOMELAB_KUBECTL", default_value = DEFAULT_KUBECTL)]
    pub kubectl: String,

    /// Kubeconfig passed to kubectl (defaults to kubectl's own lookup)
    #[arg(long, env = "KUBECONFIG")]
    pub kubeconfig: Option<String>,

    /// Kube context passed to kubectl
    #[arg(long, env = "HOMELAB_KUBE_CONTEXT")]
    pub kube_context: Option<String>,

    /// Per-command timeout in seconds
    #[arg(long, env = "HOMELAB_COMMAND_TIMEOUT", default_value_t = DEFAULT_COMMAND_TIMEOUT_SECS)]
    pub command_timeout_secs: u64,

    /// Cap on captured stdout/stderr per command, in bytes
    #[arg(long, env = "HOMELAB_MAX_OUTPUT_BYTES", default_value_t = DEFAULT_MAX_OUTPUT_BYTES)]
    pub max_output_bytes: usize,

    /// Namespace holding ArgoCD Application resources
    #[arg(long, env = "HOMELAB_ARGOCD_NAMESPACE", default_value = DEFAULT_ARGOCD_NAMESPACE)]
    pub argocd_namespace: String,

    /// Namespace of the Rook-Ceph tools pod
    #[arg(long, env = "HOMELAB_CEPH_NAMESPACE", default_value = DEFAULT_CEPH_NAMESPACE)]
    pub ceph_namespace: String,

    /// Label selector for the Rook-Ceph tools pod
    #[arg(long, env = "HOMELAB_CEPH_TOOLS_SELECTOR", default_value = DEFAULT_CEPH_TOOLS_SELECTOR)]
    pub ceph_tools_selector: String,

    /// In-cluster Prometheus base URL
    #[arg(long, env = "HOMELAB_PROMETHEUS_URL", default_value = DEFAULT_PROMETHEUS_URL)]
    pub prometheus_url: String,

    /// Image for the throwaway curl pod
    #[arg(long, env = "HOMELAB_CURL_IMAGE", default_value = DEFAULT_CURL_IMAGE)]
    pub curl_image: String,
}

impl ClusterArgs {
    /// Resolve into a validated config
    pub fn into_config(self) -> Result<ClusterConfig> {
        let config = ClusterConfig {
            kubectl: self.kubectl,
            kubeconfig: self.kubeconfig.filter(|s| !s.is_empty()),
            context: self.kube_context.filter(|s| !s.is_empty()),
            command_timeout_secs: self.command_timeout_secs,
            max_output_bytes: self.max_output_bytes,
            argocd_namespace: self.argocd_namespace,
            ceph_namespace: self.ceph_namespace,
            ceph_tools_selector: self.ceph_tools_selector,
            prometheus_url: self.prometheus_url,
            curl_image: self.curl_image,
        };
        config.validate()?;
        Ok(config)
    }
}
