//! Banter agent binary — the worker entry point.
//!
//! Loads configuration, wires the shared runtime (gateway, tools, event
//! bus, room access), and serves the health endpoint with structured
//! logging and graceful shutdown on SIGTERM/SIGINT.

use banter_agent::{app, config, AgentRuntime, AGENT_VERSION};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("BANTER_CONFIG") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("banter.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the agent cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );
    tracing::info!(version = AGENT_VERSION, "starting voice agent");

    // Wire the shared runtime. The gateway client logs its own
    // configuration state as it is built.
    let runtime = AgentRuntime::from_config(&config);
    if runtime.room_access.is_enabled() {
        tracing::info!(url = runtime.room_access.url(), "LiveKit room access configured");
    } else {
        tracing::info!("LIVEKIT_URL not set - room access disabled");
    }
    tracing::info!(
        stt = %runtime.session_options.stt,
        llm = %runtime.session_options.llm,
        tts = %runtime.session_options.tts,
        vad = %runtime.session_options.vad,
        turn_detection = %runtime.session_options.turn_detection,
        "voice pipeline selection"
    );

    // Serve the health endpoint
    let app = app();
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting banter agent worker");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("banter agent shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
