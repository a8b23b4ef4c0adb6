//! The seam between games and whoever turns their events into messages.
//!
//! A game calls [`EventSink::emit`] synchronously, while it still holds its
//! own lock, right after a transition. Sinks must therefore be cheap and
//! must never block. Forwarding into a channel is the intended shape; the
//! receiving task does the slow part (network calls) on its own time.

use rallypoint_protocol::GameEvent;
use tokio::sync::mpsc;

/// Receives state-change events from games.
///
/// `Send + Sync + 'static` because one sink is shared by every game and
/// called from whichever task mutates the game, including timer tasks.
pub trait EventSink: Send + Sync + 'static {
    /// Delivers one event. Must not block and cannot fail: the game's state
    /// is already committed by the time this is called.
    fn emit(&self, event: GameEvent);
}

/// Forwards events into an unbounded channel.
///
/// A closed receiver drops the event. Delivery is the receiver's concern,
/// and the game never rolls back because nobody was listening.
impl EventSink for mpsc::UnboundedSender<GameEvent> {
    fn emit(&self, event: GameEvent) {
        if let Err(err) = self.send(event) {
            tracing::debug!(
                state = %err.0.state,
                kind = %err.0.kind,
                "event sink closed, dropping event"
            );
        }
    }
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: GameEvent) {}
}
