//! Banter agent library logic.
//!
//! Wires the pieces the binary and every room session share: the backend
//! gateway, the builtin tool registry, the event bus with its logging
//! observer, and LiveKit room access. Also exposes the small HTTP surface
//! (a health endpoint) the deployment probes.

pub mod config;
pub mod room;

use axum::{routing::get, Json, Router};
use banter_gateway::GatewayClient;
use banter_observe::{EventBus, LoggingObserver};
use banter_session::SessionOptions;
use banter_tools::{builtin_registry, ToolRegistry};
use config::Config;
use room::RoomAccess;
use serde_json::{json, Value};
use std::sync::Arc;

/// Agent version reported on the health endpoint and at startup.
pub const AGENT_VERSION: &str = "1.0.5";

/// Shared components every room session draws from.
pub struct AgentRuntime {
    pub gateway: GatewayClient,
    pub tools: Arc<ToolRegistry>,
    pub bus: Arc<EventBus>,
    pub room_access: RoomAccess,
    pub session_options: SessionOptions,
}

impl AgentRuntime {
    /// Wires the runtime from loaded configuration.
    ///
    /// The tool registry is built over one gateway client, so tools share
    /// its connection pool, and the logging observer is attached before any
    /// session can emit.
    pub fn from_config(config: &Config) -> Self {
        let gateway = GatewayClient::new(config.backend.clone());
        let tools = Arc::new(builtin_registry(gateway.clone()));
        let bus = Arc::new(EventBus::new());
        LoggingObserver::attach(&bus);
        let room_access = RoomAccess::new(config.livekit.clone());

        Self {
            gateway,
            tools,
            bus,
            room_access,
            session_options: config.session.clone(),
        }
    }
}

/// Health check handler.
///
/// Returns `200 OK` with agent status and version. Used by load balancers,
/// monitoring, and CI to verify the worker is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": AGENT_VERSION
    }))
}

/// Builds the application router with all routes.
pub fn app() -> Router {
    Router::new().route("/health", get(health))
}
