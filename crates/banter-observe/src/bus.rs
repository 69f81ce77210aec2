//! The in-process session event bus.

use crate::event::{EventKind, SessionEvent};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Handler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// A publish/subscribe bus keyed by [`EventKind`].
///
/// Handlers for one kind fire in registration order; no ordering is
/// guaranteed across kinds. Emitting a kind nobody subscribed to is a
/// no-op, so the conversation loop never depends on an observer being
/// present.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every future event of `kind`.
    pub fn subscribe(
        &self,
        kind: EventKind,
        handler: impl Fn(&SessionEvent) + Send + Sync + 'static,
    ) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Delivers `event` to every handler subscribed to its kind.
    ///
    /// Handlers run synchronously on the emitting task, outside the bus
    /// lock, so a handler may subscribe or emit without deadlocking.
    pub fn emit(&self, event: &SessionEvent) {
        let handlers: Vec<Handler> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match subscribers.get(&event.kind()) {
                Some(handlers) => handlers.clone(),
                None => return,
            }
        };
        for handler in &handlers {
            handler(event);
        }
    }

    /// Number of handlers registered for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut counts: Vec<(&'static str, usize)> = subscribers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}
