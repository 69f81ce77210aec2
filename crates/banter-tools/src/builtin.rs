//! The two built-in backend delegation tools.
//!
//! Both are thin wrappers over [`GatewayClient::call`]: the gateway owns
//! transport, authentication, and phrasing, so each tool only shapes the
//! request payload for its endpoint.

use crate::registry::ToolRegistry;
use crate::tool::Tool;
use crate::ToolError;
use async_trait::async_trait;
use banter_gateway::{BackendEndpoint, GatewayClient, SpokenResponse};
use serde_json::{json, Value};
use std::sync::Arc;

/// Identity sent with delegated LLM prompts so the backend can tell agent
/// traffic from real users.
pub const AGENT_USER_EMAIL: &str = "agent@voice";

/// Increments the shared counter through the backend.
#[derive(Debug, Clone)]
pub struct IncrementCounterTool {
    gateway: GatewayClient,
}

impl IncrementCounterTool {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for IncrementCounterTool {
    fn name(&self) -> &str {
        "increment_counter"
    }

    fn description(&self) -> &str {
        "Increment the database counter to demonstrate backend and database \
         integration. This shows the voice agent can call edge functions that \
         interact with the database. Returns the new counter value."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _arguments: &Value) -> Result<SpokenResponse, ToolError> {
        Ok(self
            .gateway
            .call(BackendEndpoint::IncrementCounter, &json!({}))
            .await)
    }
}

/// Delegates a prompt to the backend's LLM endpoint.
#[derive(Debug, Clone)]
pub struct CallBackendLlmTool {
    gateway: GatewayClient,
}

impl CallBackendLlmTool {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Tool for CallBackendLlmTool {
    fn name(&self) -> &str {
        "call_backend_llm"
    }

    fn description(&self) -> &str {
        "Call the test-llm edge function to demonstrate calling an LLM from \
         the agent. This shows how the voice agent can delegate to other LLMs \
         for specialized tasks."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "The prompt to send to the backend LLM"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, arguments: &Value) -> Result<SpokenResponse, ToolError> {
        let prompt = arguments
            .get("prompt")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: "call_backend_llm",
                detail: "missing required string parameter \"prompt\"".to_string(),
            })?;

        let payload = json!({
            "prompt": prompt,
            "user_email": AGENT_USER_EMAIL,
        });
        Ok(self.gateway.call(BackendEndpoint::DelegateLlm, &payload).await)
    }
}

/// Builds the registry every session starts with: the counter tool and the
/// LLM delegation tool, both sharing one gateway client.
pub fn builtin_registry(gateway: GatewayClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(IncrementCounterTool::new(gateway.clone())));
    registry.register(Arc::new(CallBackendLlmTool::new(gateway)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_gateway::GatewayConfig;

    fn disabled_gateway() -> GatewayClient {
        GatewayClient::new(GatewayConfig::new("", ""))
    }

    #[test]
    fn builtin_registry_holds_both_tools() {
        let registry = builtin_registry(disabled_gateway());
        assert_eq!(registry.len(), 2);
        assert!(registry.get("increment_counter").is_some());
        assert!(registry.get("call_backend_llm").is_some());
    }

    #[test]
    fn counter_tool_takes_no_parameters() {
        let tool = IncrementCounterTool::new(disabled_gateway());
        let parameters = tool.parameters();
        assert_eq!(parameters["type"], "object");
        assert!(parameters["required"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn llm_tool_requires_a_prompt() {
        let tool = CallBackendLlmTool::new(disabled_gateway());
        let parameters = tool.parameters();
        assert_eq!(parameters["required"][0], "prompt");
        assert_eq!(parameters["properties"]["prompt"]["type"], "string");
    }

    #[tokio::test]
    async fn llm_tool_rejects_missing_prompt() {
        let tool = CallBackendLlmTool::new(disabled_gateway());
        let result = tool.execute(&json!({})).await;
        assert!(matches!(
            result,
            Err(ToolError::InvalidArguments { tool: "call_backend_llm", .. })
        ));
    }

    #[tokio::test]
    async fn llm_tool_rejects_non_string_prompt() {
        let tool = CallBackendLlmTool::new(disabled_gateway());
        let result = tool.execute(&json!({"prompt": 42})).await;
        assert!(result.is_err());
    }
}
