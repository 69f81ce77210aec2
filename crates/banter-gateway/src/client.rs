use crate::config::GatewayConfig;
use crate::endpoint::BackendEndpoint;
use crate::error::GatewayError;
use crate::speech::SpokenResponse;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed timeout applied to every outbound call. A call runs to completion
/// or to this deadline; there is no retry and no cancellation beyond it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the shared secret to the edge functions.
pub const AGENT_SECRET_HEADER: &str = "X-Agent-Secret";

/// Longest slice of an error body embedded in a spoken message.
const MAX_ERROR_DETAIL_BYTES: usize = 200;

/// Client for the backend edge functions.
///
/// Stateless beyond its read-only configuration. The inner `reqwest::Client`
/// holds the connection pool and is cheap to clone, so concurrent calls from
/// overlapping turns are safe and fully independent: no caching, no
/// deduplication, at most one request per call.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        if config.url.is_empty() {
            info!("no backend URL configured; backend function calls are disabled");
        } else if config.agent_secret.is_empty() {
            warn!("agent secret is not set; backend calls may fail authentication");
        }
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Whether outbound calls are possible at all.
    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn base_url(&self) -> &str {
        &self.config.url
    }

    /// Performs the POST and hands back the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Disabled` when no base URL is configured,
    /// `Transport` for connection and timeout failures, `Status` for non-2xx
    /// replies, and `Parse` when a 2xx body is not JSON. The disabled check
    /// happens before any network I/O.
    pub async fn execute(
        &self,
        endpoint: BackendEndpoint,
        payload: &Value,
    ) -> Result<Value, GatewayError> {
        if !self.is_enabled() {
            return Err(GatewayError::Disabled);
        }

        let url = format!(
            "{}{}",
            self.config.url.trim_end_matches('/'),
            endpoint.path()
        );

        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header(AGENT_SECRET_HEADER, &self.config.agent_secret)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail: error_detail(&body, status),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Calls the endpoint and folds every outcome into speakable text.
    ///
    /// This is the tool boundary: it never fails. Success is phrased from
    /// the response body, failures become an error sentence, and the
    /// disabled state returns its fixed message without any network I/O.
    pub async fn call(&self, endpoint: BackendEndpoint, payload: &Value) -> SpokenResponse {
        match self.execute(endpoint, payload).await {
            Ok(body) => {
                debug!(path = endpoint.path(), %body, "backend call succeeded");
                endpoint.speak_success(&body)
            }
            Err(GatewayError::Disabled) => endpoint.speak_failure(&GatewayError::Disabled),
            Err(error) => {
                warn!(path = endpoint.path(), %error, "backend call failed");
                endpoint.speak_failure(&error)
            }
        }
    }
}

/// Trims an error body for embedding in logs and spoken messages. Falls
/// back to the status line's canonical reason when the body is empty.
fn error_detail(body: &str, status: reqwest::StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
    }
    let mut detail = trimmed.to_string();
    if detail.len() > MAX_ERROR_DETAIL_BYTES {
        let mut cut = MAX_ERROR_DETAIL_BYTES;
        while !detail.is_char_boundary(cut) {
            cut -= 1;
        }
        detail.truncate(cut);
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_the_body() {
        let detail = error_detail("{\"error\":\"boom\"}", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(detail, "{\"error\":\"boom\"}");
    }

    #[test]
    fn error_detail_falls_back_to_the_reason() {
        let detail = error_detail("  ", reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(detail, "Internal Server Error");
    }

    #[test]
    fn error_detail_truncates_on_char_boundaries() {
        let body = "ü".repeat(300);
        let detail = error_detail(&body, reqwest::StatusCode::BAD_REQUEST);
        assert!(detail.len() <= MAX_ERROR_DETAIL_BYTES);
        assert!(detail.chars().all(|c| c == 'ü'));
    }

    #[test]
    fn empty_url_disables_the_client() {
        let client = GatewayClient::new(GatewayConfig::new("", "secret"));
        assert!(!client.is_enabled());

        let client = GatewayClient::new(GatewayConfig::new("http://backend", ""));
        assert!(client.is_enabled());
    }
}
