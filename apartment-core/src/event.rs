//! Engine → console event envelopes and the channel that carries them.
//!
//! The engine never calls into console state directly. It pushes
//! [`EventEnvelope`]s into an [`EventSink`]; the console drains the matching
//! [`EventStream`] on its own schedule. The channel is FIFO, so envelopes
//! arrive in emission order.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// A message from the scene engine to the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum EventEnvelope {
    /// Asset loading progress, 0-100, never decreasing.
    LoadingProgress(u8),
    /// Assets finished loading. Emitted exactly once per engine instance.
    LoadingComplete,
    /// Spontaneous output from scene interaction (e.g. a click).
    CommandOutput(String),
    /// Reply to a dispatched command, possibly delayed.
    CommandResponse(String),
}

/// Discriminant of an [`EventEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadingProgress,
    LoadingComplete,
    CommandOutput,
    CommandResponse,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LoadingProgress => "loading-progress",
            EventKind::LoadingComplete => "loading-complete",
            EventKind::CommandOutput => "command-output",
            EventKind::CommandResponse => "command-response",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EventEnvelope {
    pub fn kind(&self) -> EventKind {
        match self {
            EventEnvelope::LoadingProgress(_) => EventKind::LoadingProgress,
            EventEnvelope::LoadingComplete => EventKind::LoadingComplete,
            EventEnvelope::CommandOutput(_) => EventKind::CommandOutput,
            EventEnvelope::CommandResponse(_) => EventKind::CommandResponse,
        }
    }

    /// The display text carried by output/response envelopes.
    pub fn text(&self) -> Option<&str> {
        match self {
            EventEnvelope::CommandOutput(text) | EventEnvelope::CommandResponse(text) => {
                Some(text)
            }
            _ => None,
        }
    }
}

/// Sending half of the event channel, owned by the engine.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<EventEnvelope>,
}

impl EventSink {
    /// Deliver an envelope. Returns `false` if the console side is gone.
    ///
    /// Never blocks.
    pub fn deliver(&self, envelope: EventEnvelope) -> bool {
        self.tx.send(envelope).is_ok()
    }
}

/// Receiving half of the event channel, owned by the console.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<EventEnvelope>,
}

impl EventStream {
    /// Take the next envelope if one is already waiting.
    pub fn try_next(&mut self) -> Option<EventEnvelope> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next envelope. `None` once every sink has been dropped.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        self.rx.recv().await
    }
}

/// Create a connected sink/stream pair.
pub fn event_channel() -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, EventStream { rx })
}
