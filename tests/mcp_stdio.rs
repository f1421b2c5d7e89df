//! End-to-end MCP session over an in-memory stdio pair
//!
//! Run with: cargo test --test mcp_stdio

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::AsyncReadExt;

use homelab::config::ClusterConfig;
use homelab::exec::ScriptedRunner;
use homelab::mcp::{HomelabHandler, McpServer};
use homelab::{Cluster, ToolRegistry};

async fn session(runner: ScriptedRunner, requests: &[Value]) -> Vec<Value> {
    let cluster = Cluster::new(Arc::new(runner), ClusterConfig::default());
    let registry = Arc::new(ToolRegistry::stdio_catalog(cluster));
    let server = McpServer::new(HomelabHandler::new(registry));

    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let (mut client, server_side) = tokio::io::duplex(1024 * 1024);
    server.serve(input.as_bytes(), server_side).await.unwrap();

    let mut output = String::new();
    client.read_to_string(&mut output).await.unwrap();
    let mut replies: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    replies.sort_by_key(|r| r["id"].as_i64().unwrap_or(-1));
    replies
}

fn tool_text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_handshake_and_listing() {
    let replies = session(
        ScriptedRunner::new(),
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        ],
    )
    .await;

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "homelab-mcp");

    let names: Vec<&str> = replies[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "get_k8s_nodes",
            "get_k8s_pods",
            "get_argocd_apps",
            "get_ceph_status",
            "get_prometheus_alerts"
        ]
    );
}

#[tokio::test]
async fn test_ceph_status_call() {
    let status = json!({"health": {"status": "HEALTH_WARN"}, "osdmap": {"num_osds": 3}});
    let replies = session(
        ScriptedRunner::new()
            .with_text("rook-ceph-tools-5b7d\n")
            .with_json(status.clone()),
        &[json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "get_ceph_status", "arguments": {}}
        })],
    )
    .await;

    let text = tool_text(&replies[0]);
    assert_eq!(serde_json::from_str::<Value>(text).unwrap(), status);
    assert!(text.starts_with("{\n  \""));
}

#[tokio::test]
async fn test_missing_tools_pod_message() {
    let replies = session(
        ScriptedRunner::new().with_text(""),
        &[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "get_ceph_status"}
        })],
    )
    .await;

    assert_eq!(replies[0]["result"]["isError"], true);
    assert_eq!(
        tool_text(&replies[0]),
        "Error: Could not find rook-ceph-tools pod"
    );
}

#[tokio::test]
async fn test_alerts_call_with_severity() {
    let body = json!({"status": "success", "data": {"alerts": [
        {"labels": {"alertname": "NodeDown", "severity": "critical"}, "state": "firing"},
        {"labels": {"alertname": "DiskFull", "severity": "warning"}, "state": "firing"}
    ]}});
    let raw = format!("{body}\npod \"curl-temp-abcd1234\" deleted\n");

    let replies = session(
        ScriptedRunner::new().with_text(raw),
        &[json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "get_prometheus_alerts", "arguments": {"severity": "critical"}}
        })],
    )
    .await;

    let summary: Value = serde_json::from_str(tool_text(&replies[0])).unwrap();
    assert_eq!(summary["total_alerts"], 1);
    assert_eq!(summary["active_alerts"], 1);
    assert_eq!(summary["alerts"][0]["labels"]["alertname"], "NodeDown");
}

#[tokio::test]
async fn test_concurrent_calls_all_answered() {
    let mut runner = ScriptedRunner::new();
    for _ in 0..4 {
        runner = runner.with_json(json!({"items": []}));
    }
    let requests: Vec<Value> = (1..=4)
        .map(|id| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": "get_k8s_nodes", "arguments": {}}
            })
        })
        .collect();

    let replies = session(runner, &requests).await;
    assert_eq!(replies.len(), 4);
    for (i, reply) in replies.iter().enumerate() {
        assert_eq!(reply["id"], (i + 1) as i64);
        let summary: Value = serde_json::from_str(tool_text(reply)).unwrap();
        assert_eq!(summary["summary"], "0 nodes total");
    }
}
