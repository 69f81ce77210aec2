//! The logging observer: records every session event through `tracing`.

use crate::bus::EventBus;
use crate::event::{EventKind, SessionEvent};
use tracing::{debug, info};

/// Subscribes a structured-logging handler to every event kind.
///
/// Purely observational; it never touches conversation state.
pub struct LoggingObserver;

impl LoggingObserver {
    /// Attaches the logging handler to `bus` for all kinds.
    pub fn attach(bus: &EventBus) {
        for kind in EventKind::ALL {
            bus.subscribe(kind, log_event);
        }
    }
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::SessionStarted { session_id, room } => {
            info!(%session_id, %room, "session started");
        }
        SessionEvent::SessionEnded { session_id } => {
            info!(%session_id, "session ended");
        }
        SessionEvent::UserStartedSpeaking => debug!("user started speaking"),
        SessionEvent::UserStoppedSpeaking => debug!("user stopped speaking"),
        SessionEvent::UserSpeechCommitted { transcript } => {
            info!(%transcript, "user speech committed");
        }
        SessionEvent::AgentStartedSpeaking => debug!("agent started speaking"),
        SessionEvent::AgentStoppedSpeaking => debug!("agent stopped speaking"),
        SessionEvent::AgentSpeechCommitted { transcript } => {
            info!(%transcript, "agent speech committed");
        }
        SessionEvent::TrackSubscribed { participant, kind } => {
            info!(%participant, %kind, "track subscribed");
        }
        SessionEvent::TrackPublished { participant, kind } => {
            info!(%participant, %kind, "track published");
        }
    }
}
