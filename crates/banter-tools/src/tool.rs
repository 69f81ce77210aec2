use crate::error::ToolError;
use async_trait::async_trait;
use banter_gateway::SpokenResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named action the language model may invoke mid-conversation.
///
/// Implementations perform no business logic beyond shaping a payload and
/// selecting an endpoint; anything heavier belongs behind the gateway, not
/// in the tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to request this tool.
    fn name(&self) -> &str;

    /// Description the model reads to decide when to invoke the tool.
    fn description(&self) -> &str;

    /// JSON schema for the tool's arguments.
    fn parameters(&self) -> Value;

    /// Runs the tool.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` for malformed arguments. Backend failures never
    /// surface here; the gateway folds them into the spoken reply.
    async fn execute(&self, arguments: &Value) -> Result<SpokenResponse, ToolError>;

    /// Definition handed to the language model as part of its callable set.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Serializable description of a tool: name, description, parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A single tool request issued by a model turn.
///
/// Created per turn, consumed once, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the requested tool.
    pub name: String,
    /// Arguments as a JSON object of parameter name to value.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}
