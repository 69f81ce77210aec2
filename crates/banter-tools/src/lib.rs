//! Model-invokable tools backed by the backend gateway.
//!
//! The registry is an explicit name-to-handler table, not reflection over
//! function signatures. Each entry carries the description and parameter
//! schema the language model reads to decide when to call it, and every
//! entry is a pure delegator: shape a payload, pick an endpoint, hand back
//! the gateway's speakable reply.
//!
//! Dispatch is the absorption point of the tool layer. An unknown tool name
//! or a handler failure becomes spoken text; a broken tool ends a turn,
//! never a session.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod tool;

pub use builtin::{builtin_registry, CallBackendLlmTool, IncrementCounterTool, AGENT_USER_EMAIL};
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDefinition, ToolInvocation};

pub use banter_gateway::SpokenResponse;
