//! End-to-end conversation loop tests with scripted providers.
//!
//! Every pipeline stage is a deterministic stub, so these tests exercise
//! the orchestration itself: voice activity capture, turn commitment, tool
//! rounds, event ordering, and history bookkeeping.

use async_trait::async_trait;
use banter_gateway::{GatewayClient, GatewayConfig, DISABLED_MESSAGE};
use banter_observe::{EventBus, EventKind, SessionEvent};
use banter_session::{
    AgentSession, AudioFrame, LanguageModel, Message, ProviderCatalog, ProviderSet, Role,
    SessionError, SessionOptions, SpeechToText, SpokenTurn, TextToSpeech, TurnDetector,
    TurnResponse, VoiceActivityDetector, AGENT_INSTRUCTIONS, GREETING_INSTRUCTIONS,
};
use banter_tools::{builtin_registry, ToolDefinition, ToolInvocation, ToolRegistry};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ── Scripted providers ───────────────────────────────────────────────

struct EnergyVad;

impl VoiceActivityDetector for EnergyVad {
    fn is_speech(&self, frame: &AudioFrame) -> bool {
        frame.pcm.iter().any(|&sample| sample != 0)
    }
}

struct ScriptedStt {
    transcripts: Mutex<VecDeque<String>>,
}

impl ScriptedStt {
    fn new(transcripts: &[&str]) -> Self {
        Self {
            transcripts: Mutex::new(transcripts.iter().map(|t| t.to_string()).collect()),
        }
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SessionError> {
        Ok(self
            .transcripts
            .lock()
            .expect("lock should not be poisoned")
            .pop_front()
            .unwrap_or_default())
    }
}

struct FailingStt;

#[async_trait]
impl SpeechToText for FailingStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SessionError> {
        Err(SessionError::Stt("transcription backend unavailable".to_string()))
    }
}

/// Pops one scripted turn per call; repeats the last turn when the script
/// runs out. Records every call for assertions.
struct ScriptedLlm {
    script: Mutex<VecDeque<TurnResponse>>,
    last: Mutex<Option<TurnResponse>>,
    seen_messages: Mutex<Vec<Vec<Message>>>,
    seen_tool_counts: Mutex<Vec<usize>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    fn new(script: Vec<TurnResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            seen_messages: Mutex::new(Vec::new()),
            seen_tool_counts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_messages(&self) -> Vec<Message> {
        self.seen_messages
            .lock()
            .expect("lock should not be poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn tool_counts(&self) -> Vec<usize> {
        self.seen_tool_counts
            .lock()
            .expect("lock should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<TurnResponse, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_messages
            .lock()
            .expect("lock should not be poisoned")
            .push(messages.to_vec());
        self.seen_tool_counts
            .lock()
            .expect("lock should not be poisoned")
            .push(tools.len());

        let next = self
            .script
            .lock()
            .expect("lock should not be poisoned")
            .pop_front();
        let mut last = self.last.lock().expect("lock should not be poisoned");
        match next {
            Some(response) => {
                *last = Some(response.clone());
                Ok(response)
            }
            None => Ok(last.clone().unwrap_or_default()),
        }
    }
}

/// Renders text to its own bytes, so audio assertions are trivial.
struct EchoTts;

#[async_trait]
impl TextToSpeech for EchoTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SessionError> {
        Ok(text.as_bytes().to_vec())
    }
}

struct AlwaysDone;

impl TurnDetector for AlwaysDone {
    fn is_turn_complete(&self, _transcript: &str) -> bool {
        true
    }
}

struct PunctuationTurns;

impl TurnDetector for PunctuationTurns {
    fn is_turn_complete(&self, transcript: &str) -> bool {
        transcript.ends_with(&['.', '?', '!'][..])
    }
}

// ── Wiring helpers ───────────────────────────────────────────────────

fn disabled_registry() -> ToolRegistry {
    builtin_registry(GatewayClient::new(GatewayConfig::new("", "")))
}

fn collect_events(bus: &EventBus) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in EventKind::ALL {
        let sink = Arc::clone(&seen);
        bus.subscribe(kind, move |event| {
            sink.lock()
                .expect("lock should not be poisoned")
                .push(event.kind().to_string());
        });
    }
    seen
}

fn session_with(
    llm: Arc<ScriptedLlm>,
    stt: Arc<dyn SpeechToText>,
    turn: Arc<dyn TurnDetector>,
    tools: ToolRegistry,
    bus: Arc<EventBus>,
) -> AgentSession {
    let providers = ProviderSet {
        vad: Arc::new(EnergyVad),
        stt,
        llm,
        tts: Arc::new(EchoTts),
        turn,
    };
    AgentSession::new(
        "demo-room",
        SessionOptions::default(),
        providers,
        Arc::new(tools),
        bus,
    )
}

fn loud() -> AudioFrame {
    AudioFrame::new(vec![100; 320], 16000)
}

fn quiet() -> AudioFrame {
    AudioFrame::new(vec![0; 320], 16000)
}

/// Speaks a scripted utterance into the session: voiced frames followed by
/// enough quiet frames to close it.
async fn utter(session: &AgentSession) -> Result<Option<SpokenTurn>, SessionError> {
    for _ in 0..5 {
        session.push_audio(&loud()).await?;
    }
    let mut committed = None;
    for _ in 0..10 {
        if let Some(turn) = session.push_audio(&quiet()).await? {
            committed = Some(turn);
        }
    }
    Ok(committed)
}

// ── Greeting and direct replies ──────────────────────────────────────

#[tokio::test]
async fn greeting_flows_through_the_pipeline() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken(
        "Hi! I can answer questions and demonstrate backend calls.",
    )]));
    let bus = Arc::new(EventBus::new());
    let events = collect_events(&bus);
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    let turn = session.start().await.expect("greeting should succeed");

    assert_eq!(
        turn.text.as_str(),
        "Hi! I can answer questions and demonstrate backend calls."
    );
    assert_eq!(turn.audio, turn.text.as_str().as_bytes());

    let events = events.lock().expect("lock should not be poisoned");
    assert_eq!(
        *events,
        [
            "SESSION_STARTED",
            "TRACK_PUBLISHED",
            "AGENT_STARTED_SPEAKING",
            "AGENT_STOPPED_SPEAKING",
            "AGENT_SPEECH_COMMITTED",
        ]
    );

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Message::system(AGENT_INSTRUCTIONS));
    assert_eq!(history[1].role, Role::Assistant);
}

#[tokio::test]
async fn greeting_instruction_is_ephemeral_and_tool_free() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken("Hello!")]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    session.start().await.expect("greeting should succeed");

    let seen = llm.last_messages();
    assert!(
        seen.iter().any(|m| m.content == GREETING_INSTRUCTIONS),
        "the greeting instruction must reach the model"
    );
    assert_eq!(llm.tool_counts(), vec![0], "the greeting turn carries no tools");

    let history = session.history().await;
    assert!(
        history.iter().all(|m| m.content != GREETING_INSTRUCTIONS),
        "the greeting instruction must not persist in history"
    );
}

#[tokio::test]
async fn direct_reply_skips_tools() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken(
        "It is a voice demo.",
    )]));
    let bus = Arc::new(EventBus::new());
    let events = collect_events(&bus);
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    let turn = session
        .handle_utterance("what is this app?")
        .await
        .expect("turn should succeed");

    assert_eq!(turn.text.as_str(), "It is a voice demo.");
    assert_eq!(llm.calls(), 1);
    assert_eq!(llm.tool_counts(), vec![2], "both builtins are offered to the model");

    let events = events.lock().expect("lock should not be poisoned");
    assert_eq!(events[0], "USER_SPEECH_COMMITTED");

    let history = session.history().await;
    assert_eq!(history[1], Message::user("what is this app?"));
    assert_eq!(history[2], Message::assistant("It is a voice demo."));
}

// ── Tool rounds ──────────────────────────────────────────────────────

#[tokio::test]
async fn tool_response_feeds_the_next_round() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        TurnResponse::calling(vec![ToolInvocation::new("increment_counter", json!({}))]),
        TurnResponse::spoken("The backend is not configured right now."),
    ]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let turn = session
        .handle_utterance("test the backend")
        .await
        .expect("turn should succeed");

    assert_eq!(turn.text.as_str(), "The backend is not configured right now.");
    assert_eq!(llm.calls(), 2);

    let history = session.history().await;
    let tool_messages: Vec<&Message> =
        history.iter().filter(|m| m.role == Role::Tool).collect();
    assert_eq!(tool_messages.len(), 1);
    assert_eq!(tool_messages[0].content, DISABLED_MESSAGE);

    let second_call = llm.last_messages();
    assert!(
        second_call.iter().any(|m| m.role == Role::Tool && m.content == DISABLED_MESSAGE),
        "the tool response must be visible to the next model round"
    );
}

#[tokio::test]
async fn interim_content_is_kept_in_history() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        TurnResponse {
            content: Some("Let me check.".to_string()),
            tool_calls: vec![ToolInvocation::new("increment_counter", json!({}))],
        },
        TurnResponse::spoken("All done."),
    ]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let turn = session
        .handle_utterance("increment the counter")
        .await
        .expect("turn should succeed");

    assert_eq!(turn.text.as_str(), "All done.");

    let history = session.history().await;
    assert!(history.contains(&Message::assistant("Let me check.")));
    assert!(history.iter().any(|m| m.role == Role::Tool));
}

#[tokio::test]
async fn tool_rounds_are_bounded() {
    // The model insists on tools forever; the loop must stop and speak the
    // last tool response instead.
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::calling(vec![
        ToolInvocation::new("increment_counter", json!({})),
    ])]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let turn = session
        .handle_utterance("keep testing the backend")
        .await
        .expect("turn should succeed");

    assert_eq!(llm.calls(), 3);
    assert_eq!(turn.text.as_str(), DISABLED_MESSAGE);
}

#[tokio::test]
async fn unknown_tool_request_still_produces_a_turn() {
    let llm = Arc::new(ScriptedLlm::new(vec![
        TurnResponse::calling(vec![ToolInvocation::new("launch_rockets", json!({}))]),
        TurnResponse::spoken("I cannot do that."),
    ]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let turn = session
        .handle_utterance("launch the rockets")
        .await
        .expect("turn should succeed");

    assert_eq!(turn.text.as_str(), "I cannot do that.");
    let history = session.history().await;
    let tool_message = history
        .iter()
        .find(|m| m.role == Role::Tool)
        .expect("the absorbed failure should be in history");
    assert!(tool_message.content.starts_with("Error:"));
    assert!(tool_message.content.contains("launch_rockets"));
}

// ── Audio capture and turn detection ─────────────────────────────────

#[tokio::test]
async fn push_audio_commits_after_quiet_frames() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken(
        "The counter demo is ready.",
    )]));
    let bus = Arc::new(EventBus::new());
    let events = collect_events(&bus);
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&["what is the counter at?"])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    for _ in 0..5 {
        let out = session.push_audio(&loud()).await.expect("frame should be accepted");
        assert!(out.is_none());
    }
    for _ in 0..9 {
        let out = session.push_audio(&quiet()).await.expect("frame should be accepted");
        assert!(out.is_none(), "the utterance must stay open until enough quiet frames");
    }
    let turn = session
        .push_audio(&quiet())
        .await
        .expect("frame should be accepted")
        .expect("the tenth quiet frame should commit the turn");

    assert_eq!(turn.text.as_str(), "The counter demo is ready.");

    let events = events.lock().expect("lock should not be poisoned");
    let started = events.iter().filter(|e| *e == "USER_STARTED_SPEAKING").count();
    let stopped = events.iter().filter(|e| *e == "USER_STOPPED_SPEAKING").count();
    assert_eq!((started, stopped), (1, 1));
    assert!(events.contains(&"USER_SPEECH_COMMITTED".to_string()));
}

#[tokio::test]
async fn silence_alone_never_opens_an_utterance() {
    let llm = Arc::new(ScriptedLlm::new(vec![]));
    let bus = Arc::new(EventBus::new());
    let events = collect_events(&bus);
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    for _ in 0..30 {
        let out = session.push_audio(&quiet()).await.expect("frame should be accepted");
        assert!(out.is_none());
    }

    assert_eq!(llm.calls(), 0);
    assert!(events.lock().expect("lock should not be poisoned").is_empty());
}

#[tokio::test]
async fn partial_turns_accumulate_until_the_detector_agrees() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken(
        "The counter tracks backend calls.",
    )]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&["tell me", "about the counter."])),
        Arc::new(PunctuationTurns),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let first = utter(&session).await.expect("first utterance should be accepted");
    assert!(first.is_none(), "an unfinished turn must not reach the model");
    assert_eq!(llm.calls(), 0);

    let second = utter(&session)
        .await
        .expect("second utterance should be accepted")
        .expect("the finished turn should produce a reply");
    assert_eq!(second.text.as_str(), "The counter tracks backend calls.");

    let user_message = llm
        .last_messages()
        .into_iter()
        .rev()
        .find(|m| m.role == Role::User)
        .expect("the model should see the user turn");
    assert_eq!(user_message.content, "tell me about the counter.");
}

#[tokio::test]
async fn empty_transcripts_are_dropped() {
    let llm = Arc::new(ScriptedLlm::new(vec![]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(ScriptedStt::new(&[""])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let out = utter(&session).await.expect("utterance should be accepted");
    assert!(out.is_none());
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn stt_failure_propagates() {
    let llm = Arc::new(ScriptedLlm::new(vec![]));
    let session = session_with(
        Arc::clone(&llm),
        Arc::new(FailingStt),
        Arc::new(AlwaysDone),
        disabled_registry(),
        Arc::new(EventBus::new()),
    );

    let result = utter(&session).await;
    assert!(matches!(result, Err(SessionError::Stt(_))));
}

// ── Lifecycle ────────────────────────────────────────────────────────

#[tokio::test]
async fn close_emits_session_ended() {
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken("Hello!")]));
    let bus = Arc::new(EventBus::new());
    let events = collect_events(&bus);
    let session = session_with(
        llm,
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    session.start().await.expect("greeting should succeed");
    session.close().await;

    let events = events.lock().expect("lock should not be poisoned");
    assert_eq!(events.first().map(String::as_str), Some("SESSION_STARTED"));
    assert_eq!(events.last().map(String::as_str), Some("SESSION_ENDED"));
}

#[tokio::test]
async fn track_subscriptions_are_observable() {
    let llm = Arc::new(ScriptedLlm::new(vec![]));
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(EventKind::TrackSubscribed, move |event| {
        if let SessionEvent::TrackSubscribed { participant, kind } = event {
            sink.lock()
                .expect("lock should not be poisoned")
                .push((participant.clone(), kind.clone()));
        }
    });
    let session = session_with(
        llm,
        Arc::new(ScriptedStt::new(&[])),
        Arc::new(AlwaysDone),
        disabled_registry(),
        bus,
    );

    session.on_track_subscribed("user-42", "audio");

    let seen = seen.lock().expect("lock should not be poisoned");
    assert_eq!(*seen, vec![("user-42".to_string(), "audio".to_string())]);
}

// ── Catalog wiring ───────────────────────────────────────────────────

#[tokio::test]
async fn catalog_resolution_drives_a_real_turn() {
    let options = SessionOptions::default();
    let llm = Arc::new(ScriptedLlm::new(vec![TurnResponse::spoken("Wired up.")]));

    let mut catalog = ProviderCatalog::new();
    catalog.register_vad(&options.vad, Arc::new(EnergyVad));
    catalog.register_stt(&options.stt, Arc::new(ScriptedStt::new(&["hello there"])));
    catalog.register_llm(&options.llm, Arc::clone(&llm) as Arc<dyn LanguageModel>);
    catalog.register_tts(&options.tts, Arc::new(EchoTts));
    catalog.register_turn_detector(&options.turn_detection, Arc::new(AlwaysDone));

    let providers = catalog.resolve(&options).expect("all stages are registered");
    let session = AgentSession::new(
        "demo-room",
        options,
        providers,
        Arc::new(disabled_registry()),
        Arc::new(EventBus::new()),
    );

    let turn = utter(&session)
        .await
        .expect("utterance should be accepted")
        .expect("the turn should produce a reply");
    assert_eq!(turn.text.as_str(), "Wired up.");
    assert_eq!(llm.calls(), 1);
}
