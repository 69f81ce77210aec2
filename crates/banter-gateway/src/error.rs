use thiserror::Error;

/// Failures a backend call can hit before a spoken reply is produced.
///
/// None of these cross the tool boundary. `GatewayClient::call` folds each
/// variant into a sentence; the enum exists so logs and tests can tell the
/// failure modes apart.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No base URL is configured, so outbound calls are disabled.
    #[error("backend calls are disabled: no base URL configured")]
    Disabled,

    /// Connection, DNS, or timeout failure from the HTTP client.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The backend answered 2xx but the body was not valid JSON.
    #[error("backend returned an unreadable body: {0}")]
    Parse(#[from] serde_json::Error),
}
