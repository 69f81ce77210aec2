//! Provider seams for the voice pipeline.
//!
//! Each pipeline stage is a trait object resolved by name from the
//! [`ProviderCatalog`](crate::ProviderCatalog). The session never knows
//! which vendor sits behind a seam; it only drives the contract below.

use crate::error::SessionError;
use async_trait::async_trait;
use banter_tools::{ToolDefinition, ToolInvocation};
use serde::{Deserialize, Serialize};

/// A chunk of raw PCM audio (s16le) from the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    pub pcm: Vec<u8>,
    pub sample_rate: u32,
}

impl AudioFrame {
    pub fn new(pcm: Vec<u8>, sample_rate: u32) -> Self {
        Self { pcm, sample_rate }
    }
}

/// Who said what in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self { role: Role::Tool, content: content.into() }
    }
}

/// The model's decision for one turn: speak, call tools, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnResponse {
    /// Text to speak, if the model chose to answer directly.
    pub content: Option<String>,
    /// Tools the model wants run before the turn can finish.
    pub tool_calls: Vec<ToolInvocation>,
}

impl TurnResponse {
    pub fn spoken(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn calling(tool_calls: Vec<ToolInvocation>) -> Self {
        Self { content: None, tool_calls }
    }
}

/// Judges whether a single audio frame contains speech.
pub trait VoiceActivityDetector: Send + Sync {
    fn is_speech(&self, frame: &AudioFrame) -> bool;
}

/// Transcribes a finished utterance to text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// # Errors
    ///
    /// Returns `SessionError::Stt` when the provider cannot produce a
    /// transcript.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, SessionError>;
}

/// Produces the model's next turn given the history and callable tools.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// # Errors
    ///
    /// Returns `SessionError::Llm` when the provider cannot complete the
    /// turn.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<TurnResponse, SessionError>;
}

/// Renders reply text to raw PCM audio.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// # Errors
    ///
    /// Returns `SessionError::Tts` when synthesis fails.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SessionError>;
}

/// Decides whether an accumulated transcript is a finished user turn.
pub trait TurnDetector: Send + Sync {
    fn is_turn_complete(&self, transcript: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_the_role() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role, Role::User);
        assert_eq!(Message::assistant("a").role, Role::Assistant);
        assert_eq!(Message::tool("t").role, Role::Tool);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::user("hello")).expect("should serialize");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should parse");
        assert_eq!(parsed["role"], "user");
        assert_eq!(parsed["content"], "hello");
    }

    #[test]
    fn turn_response_helpers() {
        let spoken = TurnResponse::spoken("hi");
        assert_eq!(spoken.content.as_deref(), Some("hi"));
        assert!(spoken.tool_calls.is_empty());

        let calling = TurnResponse::calling(vec![ToolInvocation::new(
            "increment_counter",
            serde_json::json!({}),
        )]);
        assert!(calling.content.is_none());
        assert_eq!(calling.tool_calls.len(), 1);

        let empty = TurnResponse::default();
        assert!(empty.content.is_none());
        assert!(empty.tool_calls.is_empty());
    }
}
