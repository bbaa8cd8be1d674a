//! Engine time and delayed calls.

use std::time::Duration;

use crate::engine::scene::SceneKey;
use crate::event::EventEnvelope;

/// Work scheduled for a later engine tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Shut down the current scene and start another.
    StartScene(SceneKey),
    /// Emit an envelope, provided the engine is still live.
    Emit(EventEnvelope),
}

#[derive(Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    action: DeferredAction,
}

/// Delayed calls keyed to engine time.
///
/// Actions fire in due order; actions due at the same instant fire in the
/// order they were scheduled.
#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current engine time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `action` to fire `delay` after the current engine time.
    pub fn delayed_call(&mut self, delay: Duration, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay,
            seq,
            action,
        });
    }

    /// Advance engine time and return every action that became due.
    pub fn advance(&mut self, dt: Duration) -> Vec<DeferredAction> {
        self.now += dt;
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        let mut remaining = Vec::with_capacity(self.pending.len());
        for pending in self.pending.drain(..) {
            if pending.due <= now {
                due.push(pending);
            } else {
                remaining.push(pending);
            }
        }
        self.pending = remaining;

        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.action).collect()
    }

    /// Drop every pending action. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(text: &str) -> DeferredAction {
        DeferredAction::Emit(EventEnvelope::CommandResponse(text.to_string()))
    }

    #[test]
    fn test_actions_fire_once_due() {
        let mut timeline = Timeline::new();
        timeline.delayed_call(Duration::from_millis(100), emit("a"));

        assert!(timeline.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(timeline.advance(Duration::from_millis(1)), vec![emit("a")]);
        assert!(timeline.advance(Duration::from_millis(500)).is_empty());
        assert_eq!(timeline.now(), Duration::from_millis(600));
    }

    #[test]
    fn test_due_order_then_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.delayed_call(Duration::from_millis(50), emit("late"));
        timeline.delayed_call(Duration::from_millis(10), emit("first"));
        timeline.delayed_call(Duration::from_millis(10), emit("second"));

        let fired = timeline.advance(Duration::from_millis(60));
        assert_eq!(fired, vec![emit("first"), emit("second"), emit("late")]);
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut timeline = Timeline::new();
        timeline.delayed_call(Duration::ZERO, DeferredAction::StartScene(SceneKey::Apartment));
        assert_eq!(
            timeline.advance(Duration::ZERO),
            vec![DeferredAction::StartScene(SceneKey::Apartment)]
        );
    }

    #[test]
    fn test_cancel_all_drops_pending() {
        let mut timeline = Timeline::new();
        timeline.delayed_call(Duration::from_millis(10), emit("a"));
        timeline.delayed_call(Duration::from_millis(20), emit("b"));

        assert_eq!(timeline.cancel_all(), 2);
        assert_eq!(timeline.pending(), 0);
        assert!(timeline.advance(Duration::from_secs(1)).is_empty());
    }
}
