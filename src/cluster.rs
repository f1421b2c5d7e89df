//! kubectl invocation against the homelab cluster

use std::sync::Arc;

use crate::config::ClusterConfig;
use crate::error::Result;
use crate::exec::{CommandOutput, CommandRunner, ProcessRunner};

/// Handle used by every query: a runner plus the cluster layout.
///
/// Cheap to clone; the runner is shared.
#[derive(Clone)]
pub struct Cluster {
    runner: Arc<dyn CommandRunner>,
    config: ClusterConfig,
}

impl Cluster {
    pub fn new(runner: Arc<dyn CommandRunner>, config: ClusterConfig) -> Self {
        Self { runner, config }
    }

    /// Cluster backed by real `kubectl` child processes
    pub fn from_config(config: ClusterConfig) -> Self {
        let runner = Arc::new(ProcessRunner::from_config(&config));
        Self::new(runner, config)
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Build a kubectl command line, including kubeconfig/context overrides
    pub fn kubectl_argv<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = vec![self.config.kubectl.clone()];
        if let Some(ref kubeconfig) = self.config.kubeconfig {
            argv.push(format!("--kubeconfig={kubeconfig}"));
        }
        if let Some(ref context) = self.config.context {
            argv.push(format!("--context={context}"));
        }
        argv.extend(args.into_iter().map(Into::into));
        argv
    }

    pub async fn kubectl<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = self.kubectl_argv(args);
        self.runner.run(&argv).await
    }

    /// Like [`Cluster::kubectl`], but stdout is returned exactly as printed
    pub async fn kubectl_stdout<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = self.kubectl_argv(args);
        self.runner.run_stdout(&argv).await
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ScriptedRunner;

    #[test]
    fn test_plain_argv() {
        let cluster = Cluster::new(Arc::new(ScriptedRunner::new()), ClusterConfig::default());
        assert_eq!(
            cluster.kubectl_argv(["get", "nodes"]),
            vec!["kubectl", "get", "nodes"]
        );
    }

    #[test]
    fn test_argv_with_overrides() {
        let config = ClusterConfig {
            kubectl: "/usr/local/bin/kubectl".to_string(),
            kubeconfig: Some("/etc/homelab/kubeconfig".to_string()),
            context: Some("homelab".to_string()),
            ..Default::default()
        };
        let cluster = Cluster::new(Arc::new(ScriptedRunner::new()), config);
        assert_eq!(
            cluster.kubectl_argv(["get", "pods"]),
            vec![
                "/usr/local/bin/kubectl",
                "--kubeconfig=/etc/homelab/kubeconfig",
                "--context=homelab",
                "get",
                "pods",
            ]
        );
    }
}
