//! Unified error type for Rallypoint.

use rallypoint_lobby::LobbyError;
use rallypoint_protocol::ProtocolError;
use rallypoint_timer::TimerError;

/// Top-level error that wraps all crate-specific errors.
///
/// Every variant is a setup problem: a bad config file, an unknown kind
/// name, a catalog that fails validation. Request-time outcomes (rejected
/// joins, unknown game IDs) are plain return values, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RallypointError {
    /// A protocol-level error (unknown kind name).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A lobby-level error (bad capacity, unknown kind, duplicate ID).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A timer could not be armed.
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// The config file is not valid TOML for [`LobbyConfig`](crate::LobbyConfig).
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
