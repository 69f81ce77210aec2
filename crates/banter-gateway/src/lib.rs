//! Outbound gateway to the backend edge functions.
//!
//! Every tool the language model can invoke bottoms out here as an
//! authenticated POST to one of two backend endpoints. Whatever the call's
//! outcome, the result is rendered as a sentence that is safe to hand to
//! speech synthesis: success is phrased from the response body, failure
//! becomes an error sentence, and a missing base URL short-circuits to a
//! fixed message without touching the network.
//!
//! `GatewayClient::call` is the absorption boundary. It never returns an
//! error; the fallible `GatewayClient::execute` underneath exists so logs
//! and tests can still tell the failure modes apart.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod speech;

pub use client::{GatewayClient, AGENT_SECRET_HEADER, REQUEST_TIMEOUT};
pub use config::GatewayConfig;
pub use endpoint::{BackendEndpoint, DISABLED_MESSAGE};
pub use error::GatewayError;
pub use speech::SpokenResponse;
