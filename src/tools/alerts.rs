//! `get_prometheus_alerts`: firing alerts fetched through a throwaway curl pod
//!
//! Prometheus is only reachable from inside the cluster network, so the
//! query runs `kubectl run --rm` with a curl image and reads the body back
//! from the attached stdout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{non_empty, parse_arguments, Tool};
use crate::cluster::Cluster;
use crate::config::MAX_ALERTS;
use crate::error::{HomelabError, Result};
use crate::exec::CommandOutput;

pub const NAME: &str = "get_prometheus_alerts";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertsArgs {
    /// Exact match on `labels.severity`; absent or empty means no filter
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    /// Alerts remaining after the severity filter
    pub total_alerts: usize,
    /// Firing alerts, before truncation
    pub active_alerts: usize,
    /// First firing alerts, at most [`MAX_ALERTS`]
    pub alerts: Vec<Value>,
}

/// Unique helper pod name so concurrent calls don't collide
pub fn helper_pod_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("curl-temp-{}", &id[..8])
}

/// kubectl arguments that fetch `url` from a disposable pod
pub fn curl_pod_args(pod_name: &str, image: &str, url: &str) -> Vec<String> {
    vec![
        "run".to_string(),
        pod_name.to_string(),
        "--rm".to_string(),
        "-i".to_string(),
        "--restart=Never".to_string(),
        format!("--image={image}"),
        "--".to_string(),
        "curl".to_string(),
        "-s".to_string(),
        url.to_string(),
    ]
}

/// Recover the Prometheus response body from the attached pod output.
///
/// kubectl may append a notice such as `pod "curl-temp-…" deleted` after the
/// body, on the same line when curl wrote no trailing newline. The first
/// JSON object that starts a line is used and anything after it is ignored.
pub fn alerts_payload(output: CommandOutput) -> Result<Value> {
    let text = match output {
        CommandOutput::Json(value) => return Ok(value),
        CommandOutput::Text(text) => text,
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(value),
        Err(e) => line_starts(&text)
            .filter(|&start| text[start..].starts_with('{'))
            .find_map(|start| first_json_value(&text[start..]))
            .ok_or_else(|| HomelabError::AlertParse(e.to_string())),
    }
}

/// Byte offsets of the first non-blank character of each line
fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |line| {
        let start = offset + (line.len() - line.trim_start().len());
        offset += line.len();
        start
    })
}

/// Decode the leading JSON value and ignore whatever follows it
fn first_json_value(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .and_then(|value| value.ok())
}

/// Severity filter first, then firing state, then truncation
pub fn summarize_alerts(payload: &Value, severity: Option<&str>) -> Result<AlertSummary> {
    if !payload.is_object() {
        return Err(HomelabError::AlertParse(
            "response is not a JSON object".to_string(),
        ));
    }

    let alerts = match payload.get("data").and_then(|data| data.get("alerts")) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(alerts)) => alerts.clone(),
        Some(_) => {
            return Err(HomelabError::AlertParse(
                "data.alerts is not a list".to_string(),
            ))
        }
    };

    let filtered: Vec<Value> = match severity {
        Some(wanted) => alerts
            .into_iter()
            .filter(|alert| {
                alert
                    .get("labels")
                    .and_then(|labels| labels.get("severity"))
                    .and_then(Value::as_str)
                    == Some(wanted)
            })
            .collect(),
        None => alerts,
    };

    let firing: Vec<Value> = filtered
        .iter()
        .filter(|alert| alert.get("state").and_then(Value::as_str) == Some("firing"))
        .cloned()
        .collect();

    Ok(AlertSummary {
        total_alerts: filtered.len(),
        active_alerts: firing.len(),
        alerts: firing.into_iter().take(MAX_ALERTS).collect(),
    })
}

pub async fn get_alerts(cluster: &Cluster, severity: Option<&str>) -> Result<AlertSummary> {
    let config = cluster.config();
    let pod_name = helper_pod_name();
    let output = cluster
        .kubectl(curl_pod_args(
            &pod_name,
            &config.curl_image,
            &config.alerts_url(),
        ))
        .await
        .map_err(|e| e.context("Error getting alerts"))?;

    let payload = alerts_payload(output)?;
    summarize_alerts(&payload, severity)
}

pub struct PrometheusAlertsTool;

#[async_trait]
impl Tool for PrometheusAlertsTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get active Prometheus alerts"
    }

    fn input_schema(&self) -> &'static str {
        r#"{
            "type": "object",
            "properties": {
                "severity": {"type": "string", "description": "Filter by severity: critical, warning, info"}
            }
        }"#
    }

    async fn call(&self, cluster: &Cluster, arguments: Value) -> Result<Value> {
        let args: AlertsArgs = parse_arguments(arguments)?;
        let severity = non_empty(args.severity);
        let summary = get_alerts(cluster, severity.as_deref()).await?;
        Ok(serde_json::to_value(summary)?)
    }
}
