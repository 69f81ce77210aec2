//! Conversation orchestration for the Banter voice agent.
//!
//! Assembles the voice pipeline (voice activity detection, speech-to-text,
//! language model, text-to-speech, turn detection) from named providers and
//! keeps a continuous turn loop alive for the duration of a room session.
//!
//! The pipeline stages are polymorphic providers selected by configuration
//! string; this crate defines the seams and the loop, not the models. A
//! session owns the conversation history, delegates tool calls to the
//! registry, and reports every transition on the shared event bus.

pub mod catalog;
pub mod error;
pub mod options;
pub mod provider;
pub mod session;

pub use catalog::{ProviderCatalog, ProviderSet};
pub use error::SessionError;
pub use options::SessionOptions;
pub use provider::{
    AudioFrame, LanguageModel, Message, Role, SpeechToText, TextToSpeech, TurnDetector,
    TurnResponse, VoiceActivityDetector,
};
pub use session::{AgentSession, SpokenTurn, AGENT_INSTRUCTIONS, GREETING_INSTRUCTIONS};
