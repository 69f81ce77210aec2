//! Observability layer for the Banter voice agent.
//!
//! Implements the in-process session event bus and the logging observer
//! that records every conversation transition. Observation is strictly
//! one-way: handlers see events after the fact and can never alter
//! conversation state or ordering, and a missing handler for any kind is
//! simply a no-op.
//!
//! # Event kinds
//!
//! | Kind | Emitted when |
//! |------|--------------|
//! | `SESSION_STARTED` / `SESSION_ENDED` | A room session begins or finishes |
//! | `USER_STARTED_SPEAKING` / `USER_STOPPED_SPEAKING` | Voice activity turns on or off |
//! | `USER_SPEECH_COMMITTED` | A finished user utterance was transcribed |
//! | `AGENT_STARTED_SPEAKING` / `AGENT_STOPPED_SPEAKING` | Synthesis playback begins or ends |
//! | `AGENT_SPEECH_COMMITTED` | The agent's reply text was finalized |
//! | `TRACK_SUBSCRIBED` / `TRACK_PUBLISHED` | Room media tracks come and go |
//!
//! # Usage
//!
//! ```rust,ignore
//! use banter_observe::{EventBus, EventKind, LoggingObserver, SessionEvent};
//!
//! let bus = EventBus::new();
//! LoggingObserver::attach(&bus);
//! bus.emit(&SessionEvent::UserSpeechCommitted {
//!     transcript: "what is the counter at?".to_string(),
//! });
//! ```

mod bus;
mod event;
mod logging;

pub use bus::EventBus;
pub use event::{EventKind, ParseEventKindError, SessionEvent};
pub use logging::LoggingObserver;
