//! LiveKit room credentials and join-token minting.

use livekit_api::access_token::{AccessToken, AccessTokenError, VideoGrants};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

fn default_token_ttl_seconds() -> u64 {
    3600
}

/// Credentials for the LiveKit deployment the agent joins.
#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// LiveKit server URL. Empty disables room access.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default, skip_serializing)]
    pub api_secret: String,

    /// JWT token TTL in seconds for room join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RoomError {
    #[error("LiveKit API error: {0}")]
    LiveKit(#[from] AccessTokenError),

    #[error("LiveKit is not configured: set LIVEKIT_URL, LIVEKIT_API_KEY, and LIVEKIT_API_SECRET")]
    Disabled,
}

/// Mints the tokens the agent presents when joining rooms.
#[derive(Debug, Clone)]
pub struct RoomAccess {
    config: LiveKitConfig,
}

impl RoomAccess {
    pub fn new(config: LiveKitConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Mints a join token granting the agent audio publish, subscribe, and
    /// data rights in `room_name`.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Disabled` when no LiveKit URL is configured, or
    /// `RoomError::LiveKit` when signing fails.
    pub fn join_token(&self, room_name: &str, identity: &str) -> Result<String, RoomError> {
        if !self.is_enabled() {
            return Err(RoomError::Disabled);
        }

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(identity)
            .with_name(identity)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        Ok(token.to_jwt()?)
    }
}
