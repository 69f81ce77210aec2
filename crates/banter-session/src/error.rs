use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("unknown {kind} provider: {id}")]
    UnknownProvider { kind: &'static str, id: String },

    #[error("STT error: {0}")]
    Stt(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("TTS error: {0}")]
    Tts(String),
}
