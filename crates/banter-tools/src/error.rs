use thiserror::Error;

/// Failures at the tool layer itself, before any backend call happens.
///
/// Absorbed by `ToolRegistry::dispatch`; they surface to the model turn as
/// spoken text only.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The model requested a tool name no entry is registered under.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The invocation's arguments do not match the tool's schema.
    #[error("invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: &'static str, detail: String },
}
