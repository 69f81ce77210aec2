//! Named provider registration and resolution.

use crate::error::SessionError;
use crate::options::SessionOptions;
use crate::provider::{
    LanguageModel, SpeechToText, TextToSpeech, TurnDetector, VoiceActivityDetector,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registered providers, keyed by the opaque identifier configuration uses.
///
/// Identifiers are matched exactly; `"assemblyai/universal-streaming:en"`
/// and `"assemblyai"` are distinct registrations.
#[derive(Default)]
pub struct ProviderCatalog {
    vad: HashMap<String, Arc<dyn VoiceActivityDetector>>,
    stt: HashMap<String, Arc<dyn SpeechToText>>,
    llm: HashMap<String, Arc<dyn LanguageModel>>,
    tts: HashMap<String, Arc<dyn TextToSpeech>>,
    turn: HashMap<String, Arc<dyn TurnDetector>>,
}

impl ProviderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_vad(
        &mut self,
        id: impl Into<String>,
        provider: Arc<dyn VoiceActivityDetector>,
    ) {
        self.vad.insert(id.into(), provider);
    }

    pub fn register_stt(&mut self, id: impl Into<String>, provider: Arc<dyn SpeechToText>) {
        self.stt.insert(id.into(), provider);
    }

    pub fn register_llm(&mut self, id: impl Into<String>, provider: Arc<dyn LanguageModel>) {
        self.llm.insert(id.into(), provider);
    }

    pub fn register_tts(&mut self, id: impl Into<String>, provider: Arc<dyn TextToSpeech>) {
        self.tts.insert(id.into(), provider);
    }

    pub fn register_turn_detector(
        &mut self,
        id: impl Into<String>,
        provider: Arc<dyn TurnDetector>,
    ) {
        self.turn.insert(id.into(), provider);
    }

    /// Resolves every pipeline stage named in `options`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownProvider` naming the first stage whose
    /// identifier has no registration.
    pub fn resolve(&self, options: &SessionOptions) -> Result<ProviderSet, SessionError> {
        Ok(ProviderSet {
            vad: lookup(&self.vad, "vad", &options.vad)?,
            stt: lookup(&self.stt, "stt", &options.stt)?,
            llm: lookup(&self.llm, "llm", &options.llm)?,
            tts: lookup(&self.tts, "tts", &options.tts)?,
            turn: lookup(&self.turn, "turn_detection", &options.turn_detection)?,
        })
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names<T: ?Sized>(map: &HashMap<String, Arc<T>>) -> Vec<&str> {
            let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
            names.sort_unstable();
            names
        }
        f.debug_struct("ProviderCatalog")
            .field("vad", &names(&self.vad))
            .field("stt", &names(&self.stt))
            .field("llm", &names(&self.llm))
            .field("tts", &names(&self.tts))
            .field("turn", &names(&self.turn))
            .finish()
    }
}

fn lookup<T: ?Sized>(
    map: &HashMap<String, Arc<T>>,
    kind: &'static str,
    id: &str,
) -> Result<Arc<T>, SessionError> {
    map.get(id).cloned().ok_or_else(|| SessionError::UnknownProvider {
        kind,
        id: id.to_string(),
    })
}

/// The resolved pipeline a session runs against.
#[derive(Clone)]
pub struct ProviderSet {
    pub vad: Arc<dyn VoiceActivityDetector>,
    pub stt: Arc<dyn SpeechToText>,
    pub llm: Arc<dyn LanguageModel>,
    pub tts: Arc<dyn TextToSpeech>,
    pub turn: Arc<dyn TurnDetector>,
}
