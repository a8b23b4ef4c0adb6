//! Error types for the lobby layer.

use std::time::Duration;

use rallypoint_protocol::{GameId, GameKind};
use rallypoint_timer::TimerError;

/// Errors that can occur while building or registering games.
///
/// None of these are request-time conditions. Rejected joins and leaves
/// are reported as `false`, and unknown game IDs as `None`. These errors
/// mean the lobby was configured or wired incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The catalog has no variant for this kind.
    #[error("no variant configured for game kind {0}")]
    UnknownKind(GameKind),

    /// A capacity window is empty or inverted.
    #[error("invalid capacity window {min}..={max} (need 1 <= min <= max)")]
    InvalidCapacity { min: usize, max: usize },

    /// A variant's timeout is longer than the lobby supports.
    #[error("timeout of {}s exceeds the maximum of {}s", .timeout.as_secs(), .max.as_secs())]
    InvalidTimeout { timeout: Duration, max: Duration },

    /// A game with this identifier is already registered.
    #[error("game {0} is already registered")]
    DuplicateId(GameId),

    /// The expiry timer could not be armed.
    #[error(transparent)]
    Timer(#[from] TimerError),
}
