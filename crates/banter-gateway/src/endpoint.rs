use crate::error::GatewayError;
use crate::speech::{speakable, SpokenResponse};
use serde_json::Value;

/// Spoken when no base URL is configured. Names the operator-facing
/// environment variables so the fix can be heard, not just found in logs.
pub const DISABLED_MESSAGE: &str =
    "Backend function calls are not configured. Please set BACKEND_URL and LIVEKIT_AGENT_SECRET.";

/// The two backend edge functions the agent can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendEndpoint {
    /// `POST /increment-counter`: bumps the shared demo counter.
    IncrementCounter,
    /// `POST /test-llm`: hands a prompt to the backend's own language model.
    DelegateLlm,
}

impl BackendEndpoint {
    /// URL path appended to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::IncrementCounter => "/increment-counter",
            Self::DelegateLlm => "/test-llm",
        }
    }

    /// Body field this endpoint's reply is phrased around when present.
    pub fn response_field(self) -> &'static str {
        match self {
            Self::IncrementCounter => "count",
            Self::DelegateLlm => "response",
        }
    }

    /// Phrases a successful response body.
    ///
    /// When the endpoint's known field is present the sentence is built from
    /// it; otherwise the raw body is echoed so an unfamiliar but successful
    /// reply still reaches the user.
    pub fn speak_success(self, body: &Value) -> SpokenResponse {
        match (self, body.get(self.response_field())) {
            (Self::IncrementCounter, Some(count)) => {
                SpokenResponse::new(format!("The counter is now at {}.", speakable(count)))
            }
            (Self::IncrementCounter, None) => {
                SpokenResponse::new(format!("Counter updated: {body}"))
            }
            (Self::DelegateLlm, Some(reply)) => {
                SpokenResponse::new(format!("Backend LLM responded: {}", speakable(reply)))
            }
            (Self::DelegateLlm, None) => SpokenResponse::new(format!("Backend responded: {body}")),
        }
    }

    /// Phrases a failed call.
    ///
    /// HTTP-level failures name the function that broke; anything unexpected
    /// gets the generic prefix. The disabled state has its fixed sentence.
    pub fn speak_failure(self, error: &GatewayError) -> SpokenResponse {
        match error {
            GatewayError::Disabled => SpokenResponse::new(DISABLED_MESSAGE),
            GatewayError::Transport(_) | GatewayError::Status { .. } => match self {
                Self::IncrementCounter => {
                    SpokenResponse::new(format!("Error calling counter function: {error}"))
                }
                Self::DelegateLlm => {
                    SpokenResponse::new(format!("Error calling backend function: {error}"))
                }
            },
            GatewayError::Parse(_) => SpokenResponse::new(format!("Error: {error}")),
        }
    }
}
