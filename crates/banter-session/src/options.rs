//! Voice pipeline selection and room behavior flags.

use serde::{Deserialize, Serialize};

/// Configuration for one room session's voice pipeline.
///
/// Provider fields are opaque identifiers resolved against the
/// [`ProviderCatalog`](crate::ProviderCatalog); the defaults name the
/// production stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Speech-to-text provider.
    #[serde(default = "default_stt")]
    pub stt: String,

    /// Language-model provider for conversation turns.
    #[serde(default = "default_llm")]
    pub llm: String,

    /// Text-to-speech provider, including the voice selection.
    #[serde(default = "default_tts")]
    pub tts: String,

    /// Voice activity detection provider.
    #[serde(default = "default_vad")]
    pub vad: String,

    /// Turn-boundary detection provider.
    #[serde(default = "default_turn_detection")]
    pub turn_detection: String,

    /// Inbound noise cancellation profile.
    #[serde(default = "default_noise_cancellation")]
    pub noise_cancellation: String,

    /// Start generating the reply before the turn is fully committed.
    #[serde(default = "default_true")]
    pub preemptive_generation: bool,

    /// Buffer user audio captured before the room connection completes.
    #[serde(default = "default_true")]
    pub pre_connect_audio: bool,

    /// How long to wait for pre-connect audio, in seconds.
    #[serde(default = "default_pre_connect_audio_timeout")]
    pub pre_connect_audio_timeout_secs: f64,
}

fn default_stt() -> String {
    "assemblyai/universal-streaming:en".to_string()
}

fn default_llm() -> String {
    "openai/gpt-4.1-mini".to_string()
}

fn default_tts() -> String {
    "cartesia/sonic-2:9626c31c-bec5-4cca-baa8-f8ba9e84c8bc".to_string()
}

fn default_vad() -> String {
    "silero".to_string()
}

fn default_turn_detection() -> String {
    "multilingual".to_string()
}

fn default_noise_cancellation() -> String {
    "bvc".to_string()
}

fn default_true() -> bool {
    true
}

fn default_pre_connect_audio_timeout() -> f64 {
    3.0
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            stt: default_stt(),
            llm: default_llm(),
            tts: default_tts(),
            vad: default_vad(),
            turn_detection: default_turn_detection(),
            noise_cancellation: default_noise_cancellation(),
            preemptive_generation: true,
            pre_connect_audio: true,
            pre_connect_audio_timeout_secs: default_pre_connect_audio_timeout(),
        }
    }
}
