//! MCP method dispatch onto a tool registry

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::protocol::{methods, InitializeResult, McpHandler, McpRequest, McpResponse, ToolCallResult};
use crate::error::HomelabError;
use crate::tools::ToolRegistry;

/// MCP request handler
pub struct HomelabHandler {
    registry: Arc<ToolRegistry>,
}

impl HomelabHandler {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Run a tool and wrap the outcome as MCP text content
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolCallResult {
        match self.registry.call(name, arguments).await {
            Ok(value) => ToolCallResult::json(&value),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }
}

#[async_trait]
impl McpHandler for HomelabHandler {
    async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let notification = request.is_notification();
        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED => return None,
            methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => {
                let tools = self.registry.definitions();
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::CALL_TOOL => match request.params.get("name").and_then(|v| v.as_str()) {
                Some(name) => {
                    let arguments = request
                        .params
                        .get("arguments")
                        .cloned()
                        .unwrap_or(json!({}));

                    let tool_result = self.call_tool(name, arguments).await;
                    McpResponse::success(request.id, json!(tool_result))
                }
                None => McpResponse::from_error(
                    request.id,
                    HomelabError::InvalidInput("tools/call requires a string `name`".to_string()),
                ),
            },
            _ => McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        };

        if notification {
            None
        } else {
            Some(response)
        }
    }
}
