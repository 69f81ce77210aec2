//! The per-room conversation loop.

use crate::catalog::ProviderSet;
use crate::error::SessionError;
use crate::options::SessionOptions;
use crate::provider::{AudioFrame, Message};
use banter_observe::{EventBus, SessionEvent};
use banter_tools::{SpokenResponse, ToolRegistry};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// System instructions framing the assistant's persona and tool usage.
pub const AGENT_INSTRUCTIONS: &str = "You are a helpful voice assistant for a web application. \
You can answer questions and demonstrate calling backend functions. \
Keep responses conversational and natural for spoken dialogue. \
When asked to test the backend or database, use the increment_counter tool. \
When asked to test the LLM, use the call_backend_llm tool.";

/// One-shot instruction for the greeting emitted on session entry.
pub const GREETING_INSTRUCTIONS: &str = "Give a brief, friendly greeting. \
Tell the user you can help answer questions and demonstrate calling backend functions. \
Keep it under 2 sentences.";

/// Upper bound on tool rounds within a single user turn. When the model is
/// still requesting tools after this many rounds, the last tool response is
/// spoken as the reply.
pub(crate) const MAX_TOOL_ROUNDS: usize = 3;

/// Consecutive quiet frames that close an open utterance.
pub(crate) const END_OF_SPEECH_FRAMES: u32 = 10;

/// A finished agent reply: the text that was spoken and its rendered audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SpokenTurn {
    pub text: SpokenResponse,
    pub audio: Vec<u8>,
}

/// Voice-activity capture state for the inbound audio stream.
#[derive(Default)]
struct CaptureState {
    speaking: bool,
    quiet_frames: u32,
    pcm: Vec<u8>,
    /// Transcript fragments awaiting a turn-complete verdict.
    pending: String,
}

/// One agent session in one room.
///
/// Owns the conversation history and drives the turn loop: audio frames in
/// through [`push_audio`](Self::push_audio), spoken replies out as
/// [`SpokenTurn`]s, every transition reported on the event bus. Tool calls
/// requested by the model are delegated to the registry, whose responses
/// are always text, so nothing a tool does can abort the session.
pub struct AgentSession {
    id: String,
    room: String,
    options: SessionOptions,
    providers: ProviderSet,
    tools: Arc<ToolRegistry>,
    bus: Arc<EventBus>,
    history: Mutex<Vec<Message>>,
    capture: Mutex<CaptureState>,
}

impl AgentSession {
    pub fn new(
        room: impl Into<String>,
        options: SessionOptions,
        providers: ProviderSet,
        tools: Arc<ToolRegistry>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            room: room.into(),
            options,
            providers,
            tools,
            bus,
            history: Mutex::new(vec![Message::system(AGENT_INSTRUCTIONS)]),
            capture: Mutex::new(CaptureState::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Snapshot of the conversation history.
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.clone()
    }

    /// Starts the session: announces it, publishes the agent's audio track,
    /// and speaks the greeting.
    ///
    /// The greeting turn runs without tools so entry always produces exactly
    /// one utterance.
    ///
    /// # Errors
    ///
    /// Fails when the language model or synthesis provider fails; the
    /// session is unusable if it cannot greet.
    pub async fn start(&self) -> Result<SpokenTurn, SessionError> {
        info!(
            session_id = %self.id,
            room = %self.room,
            stt = %self.options.stt,
            llm = %self.options.llm,
            tts = %self.options.tts,
            "voice pipeline assembled"
        );
        self.bus.emit(&SessionEvent::SessionStarted {
            session_id: self.id.clone(),
            room: self.room.clone(),
        });
        self.bus.emit(&SessionEvent::TrackPublished {
            participant: "agent".to_string(),
            kind: "audio".to_string(),
        });

        let mut messages = self.history.lock().await.clone();
        messages.push(Message::system(GREETING_INSTRUCTIONS));
        let response = self.providers.llm.complete(&messages, &[]).await?;
        let greeting = response.content.unwrap_or_default();

        let turn = self.speak(&greeting).await?;
        if !turn.text.is_empty() {
            self.history.lock().await.push(Message::assistant(turn.text.as_str()));
        }
        Ok(turn)
    }

    /// Notifies observers that a remote participant's track was subscribed.
    pub fn on_track_subscribed(&self, participant: &str, kind: &str) {
        self.bus.emit(&SessionEvent::TrackSubscribed {
            participant: participant.to_string(),
            kind: kind.to_string(),
        });
    }

    /// Feeds one inbound audio frame through voice activity detection.
    ///
    /// Frames accumulate while the user is speaking. After
    /// [`END_OF_SPEECH_FRAMES`] quiet frames the utterance is transcribed,
    /// and once the turn detector judges the accumulated transcript
    /// complete, a full conversation turn runs and its reply is returned.
    ///
    /// # Errors
    ///
    /// Propagates transcription and turn failures; a frame that merely
    /// extends or ends silence never fails.
    pub async fn push_audio(&self, frame: &AudioFrame) -> Result<Option<SpokenTurn>, SessionError> {
        let pcm = {
            let mut capture = self.capture.lock().await;
            if self.providers.vad.is_speech(frame) {
                if !capture.speaking {
                    capture.speaking = true;
                    self.bus.emit(&SessionEvent::UserStartedSpeaking);
                }
                capture.quiet_frames = 0;
                capture.pcm.extend_from_slice(&frame.pcm);
                return Ok(None);
            }
            if !capture.speaking {
                return Ok(None);
            }
            capture.quiet_frames += 1;
            if capture.quiet_frames < END_OF_SPEECH_FRAMES {
                return Ok(None);
            }
            capture.speaking = false;
            capture.quiet_frames = 0;
            std::mem::take(&mut capture.pcm)
        };
        self.bus.emit(&SessionEvent::UserStoppedSpeaking);

        let transcript = self.providers.stt.transcribe(&pcm).await?;
        if transcript.is_empty() {
            debug!("utterance produced an empty transcript");
            return Ok(None);
        }

        let pending = {
            let mut capture = self.capture.lock().await;
            if !capture.pending.is_empty() {
                capture.pending.push(' ');
            }
            capture.pending.push_str(&transcript);
            if !self.providers.turn.is_turn_complete(&capture.pending) {
                debug!(pending = %capture.pending, "waiting for the turn to finish");
                return Ok(None);
            }
            std::mem::take(&mut capture.pending)
        };

        self.handle_utterance(&pending).await.map(Some)
    }

    /// Runs one full conversation turn for a committed user utterance.
    ///
    /// The model may answer directly or request tools; tool responses are
    /// appended to the history and the model is consulted again, up to
    /// [`MAX_TOOL_ROUNDS`] rounds.
    ///
    /// # Errors
    ///
    /// Fails when the language model or synthesis provider fails. Tool
    /// failures never surface here; the registry absorbs them into text.
    pub async fn handle_utterance(&self, transcript: &str) -> Result<SpokenTurn, SessionError> {
        self.bus.emit(&SessionEvent::UserSpeechCommitted {
            transcript: transcript.to_string(),
        });

        let mut history = self.history.lock().await;
        history.push(Message::user(transcript));

        let definitions = self.tools.definitions();
        let mut last_tool_text: Option<SpokenResponse> = None;
        let mut reply = String::new();

        for _round in 0..MAX_TOOL_ROUNDS {
            let response = self.providers.llm.complete(&history, &definitions).await?;

            if let Some(content) = &response.content {
                if response.tool_calls.is_empty() {
                    reply = content.clone();
                    break;
                }
                history.push(Message::assistant(content.clone()));
            }
            if response.tool_calls.is_empty() {
                break;
            }

            for invocation in &response.tool_calls {
                let spoken = self.tools.dispatch(invocation).await;
                history.push(Message::tool(spoken.as_str()));
                last_tool_text = Some(spoken);
            }
        }

        if reply.is_empty() {
            if let Some(spoken) = last_tool_text {
                warn!(session_id = %self.id, "tool round limit reached, speaking the tool response");
                reply = spoken.into_string();
            }
        }

        drop(history);
        let turn = self.speak(&reply).await?;
        if !turn.text.is_empty() {
            self.history.lock().await.push(Message::assistant(turn.text.as_str()));
        }
        Ok(turn)
    }

    /// Renders `text` to audio and reports the speech lifecycle.
    ///
    /// Empty text is a silent no-op turn: nothing is synthesized and no
    /// speech events fire.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Tts` when synthesis fails.
    pub async fn speak(&self, text: &str) -> Result<SpokenTurn, SessionError> {
        let text = SpokenResponse::new(text);
        if text.is_empty() {
            return Ok(SpokenTurn { text, audio: Vec::new() });
        }

        self.bus.emit(&SessionEvent::AgentStartedSpeaking);
        let audio = self.providers.tts.synthesize(text.as_str()).await?;
        self.bus.emit(&SessionEvent::AgentStoppedSpeaking);
        self.bus.emit(&SessionEvent::AgentSpeechCommitted {
            transcript: text.as_str().to_string(),
        });

        Ok(SpokenTurn { text, audio })
    }

    /// Ends the session. No state persists across sessions, so cleanup is
    /// only a log line and the final event.
    pub async fn close(&self) {
        info!(session_id = %self.id, "Session ending, cleaning up...");
        self.bus.emit(&SessionEvent::SessionEnded {
            session_id: self.id.clone(),
        });
    }
}
