use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection settings for the backend edge functions.
///
/// Read once at startup and passed by value into the client; nothing
/// re-reads the environment after construction.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL for the backend. Empty disables outbound calls entirely.
    #[serde(default)]
    pub url: String,
    /// Shared secret sent as the `X-Agent-Secret` header on every call.
    /// Empty is allowed; calls then fail authentication upstream.
    #[serde(default, skip_serializing)]
    pub agent_secret: String,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("agent_secret", &"[REDACTED]")
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, agent_secret: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent_secret: agent_secret.into(),
        }
    }
}
