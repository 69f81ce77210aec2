use crate::error::ToolError;
use crate::tool::{Tool, ToolDefinition, ToolInvocation};
use banter_gateway::SpokenResponse;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Explicit table of the actions the language model may invoke.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its own name, replacing any previous entry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for the model's callable set, sorted by name so the
    /// prompt stays stable across turns.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Runs an invocation, propagating tool-level errors.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::UnknownTool` when no entry matches the requested
    /// name, or whatever the tool itself returns.
    pub async fn try_dispatch(
        &self,
        invocation: &ToolInvocation,
    ) -> Result<SpokenResponse, ToolError> {
        let tool = self
            .tools
            .get(&invocation.name)
            .ok_or_else(|| ToolError::UnknownTool(invocation.name.clone()))?;
        info!(tool = %invocation.name, "tool call");
        tool.execute(&invocation.arguments).await
    }

    /// Runs an invocation and absorbs every failure into spoken text.
    ///
    /// Exactly one `SpokenResponse` comes back per invocation, whatever
    /// happened underneath.
    pub async fn dispatch(&self, invocation: &ToolInvocation) -> SpokenResponse {
        match self.try_dispatch(invocation).await {
            Ok(response) => response,
            Err(error) => {
                warn!(tool = %invocation.name, %error, "tool call failed");
                SpokenResponse::new(format!("Error: {error}"))
            }
        }
    }
}
