//! Event kind and payload types for the session event bus.

use serde::{Deserialize, Serialize};

/// The kinds of session events the bus carries.
///
/// Kinds key handler registration: a handler subscribed to one kind never
/// sees events of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A room session started.
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted,
    /// A room session ended.
    #[serde(rename = "SESSION_ENDED")]
    SessionEnded,
    /// Voice activity detection opened a user utterance.
    #[serde(rename = "USER_STARTED_SPEAKING")]
    UserStartedSpeaking,
    /// Voice activity detection closed a user utterance.
    #[serde(rename = "USER_STOPPED_SPEAKING")]
    UserStoppedSpeaking,
    /// A finished user utterance was transcribed.
    #[serde(rename = "USER_SPEECH_COMMITTED")]
    UserSpeechCommitted,
    /// The agent began speaking a reply.
    #[serde(rename = "AGENT_STARTED_SPEAKING")]
    AgentStartedSpeaking,
    /// The agent finished speaking a reply.
    #[serde(rename = "AGENT_STOPPED_SPEAKING")]
    AgentStoppedSpeaking,
    /// The agent's reply text was finalized.
    #[serde(rename = "AGENT_SPEECH_COMMITTED")]
    AgentSpeechCommitted,
    /// A remote media track was subscribed.
    #[serde(rename = "TRACK_SUBSCRIBED")]
    TrackSubscribed,
    /// A local media track was published.
    #[serde(rename = "TRACK_PUBLISHED")]
    TrackPublished,
}

impl EventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [EventKind; 10] = [
        Self::SessionStarted,
        Self::SessionEnded,
        Self::UserStartedSpeaking,
        Self::UserStoppedSpeaking,
        Self::UserSpeechCommitted,
        Self::AgentStartedSpeaking,
        Self::AgentStoppedSpeaking,
        Self::AgentSpeechCommitted,
        Self::TrackSubscribed,
        Self::TrackPublished,
    ];

    /// Returns the canonical string label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStarted => "SESSION_STARTED",
            Self::SessionEnded => "SESSION_ENDED",
            Self::UserStartedSpeaking => "USER_STARTED_SPEAKING",
            Self::UserStoppedSpeaking => "USER_STOPPED_SPEAKING",
            Self::UserSpeechCommitted => "USER_SPEECH_COMMITTED",
            Self::AgentStartedSpeaking => "AGENT_STARTED_SPEAKING",
            Self::AgentStoppedSpeaking => "AGENT_STOPPED_SPEAKING",
            Self::AgentSpeechCommitted => "AGENT_SPEECH_COMMITTED",
            Self::TrackSubscribed => "TRACK_SUBSCRIBED",
            Self::TrackPublished => "TRACK_PUBLISHED",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SESSION_STARTED" => Ok(Self::SessionStarted),
            "SESSION_ENDED" => Ok(Self::SessionEnded),
            "USER_STARTED_SPEAKING" => Ok(Self::UserStartedSpeaking),
            "USER_STOPPED_SPEAKING" => Ok(Self::UserStoppedSpeaking),
            "USER_SPEECH_COMMITTED" => Ok(Self::UserSpeechCommitted),
            "AGENT_STARTED_SPEAKING" => Ok(Self::AgentStartedSpeaking),
            "AGENT_STOPPED_SPEAKING" => Ok(Self::AgentStoppedSpeaking),
            "AGENT_SPEECH_COMMITTED" => Ok(Self::AgentSpeechCommitted),
            "TRACK_SUBSCRIBED" => Ok(Self::TrackSubscribed),
            "TRACK_PUBLISHED" => Ok(Self::TrackPublished),
            _ => Err(ParseEventKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone)]
pub struct ParseEventKindError(pub String);

impl std::fmt::Display for ParseEventKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for ParseEventKindError {}

/// A session event with its payload.
///
/// Every variant corresponds to one [`EventKind`]; the serialized form
/// carries the kind in an `event` tag so logs and captures stay greppable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    // ── Session lifecycle ────────────────────────────────────────────
    /// A room session started.
    SessionStarted {
        /// The session identifier.
        session_id: String,
        /// The room the agent joined.
        room: String,
    },

    /// A room session ended.
    SessionEnded {
        /// The session identifier.
        session_id: String,
    },

    // ── User speech ──────────────────────────────────────────────────
    /// Voice activity detection opened a user utterance.
    UserStartedSpeaking,

    /// Voice activity detection closed a user utterance.
    UserStoppedSpeaking,

    /// A finished user utterance was transcribed.
    UserSpeechCommitted {
        /// The final transcript of the utterance.
        transcript: String,
    },

    // ── Agent speech ─────────────────────────────────────────────────
    /// The agent began speaking a reply.
    AgentStartedSpeaking,

    /// The agent finished speaking a reply.
    AgentStoppedSpeaking,

    /// The agent's reply text was finalized.
    AgentSpeechCommitted {
        /// The spoken reply text.
        transcript: String,
    },

    // ── Room media ───────────────────────────────────────────────────
    /// A remote media track was subscribed.
    TrackSubscribed {
        /// Identity of the participant owning the track.
        participant: String,
        /// The track kind, e.g. `audio`.
        kind: String,
    },

    /// A local media track was published.
    TrackPublished {
        /// Identity of the participant owning the track.
        participant: String,
        /// The track kind, e.g. `audio`.
        kind: String,
    },
}

impl SessionEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionStarted { .. } => EventKind::SessionStarted,
            Self::SessionEnded { .. } => EventKind::SessionEnded,
            Self::UserStartedSpeaking => EventKind::UserStartedSpeaking,
            Self::UserStoppedSpeaking => EventKind::UserStoppedSpeaking,
            Self::UserSpeechCommitted { .. } => EventKind::UserSpeechCommitted,
            Self::AgentStartedSpeaking => EventKind::AgentStartedSpeaking,
            Self::AgentStoppedSpeaking => EventKind::AgentStoppedSpeaking,
            Self::AgentSpeechCommitted { .. } => EventKind::AgentSpeechCommitted,
            Self::TrackSubscribed { .. } => EventKind::TrackSubscribed,
            Self::TrackPublished { .. } => EventKind::TrackPublished,
        }
    }
}
