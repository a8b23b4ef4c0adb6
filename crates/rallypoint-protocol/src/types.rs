//! Core types shared across every Rallypoint crate.
//!
//! These are the values that cross crate boundaries: identities, the kind of
//! activity a game is for, its lifecycle state, and the event a game emits
//! when that state changes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant.
///
/// This is a "newtype wrapper" around the identity string handed to us by
/// the chat platform (e.g. `U024BE7LH`). Wrapping it keeps a `PlayerId` from
/// being passed where a `GameId` is expected, even though both are strings.
///
/// `#[serde(transparent)]` serializes it as the bare string, not
/// `{ "0": "U024BE7LH" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player ID from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// An opaque identifier for one game slot.
///
/// Games never pick their own identifier. The registry mints one when the
/// game is inserted, and the caller maps it to whatever transport handle
/// (a message timestamp, a thread ID) routes later clicks back here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub String);

impl GameId {
    /// Creates a game ID from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// The closed set of activities a game slot can be opened for.
///
/// A kind decides the capacity window, the timeout, and the wording of every
/// message. Those values live in the variant catalog, not here.
///
/// `#[serde(rename_all = "lowercase")]` makes config files and events use
/// `"foosball"` rather than `"Foosball"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// Four-a-side table football.
    Foosball,
    /// Two-player arcade duel.
    Pong,
    /// Two-player chess match.
    Chess,
    /// Open darts group.
    Darts,
}

impl GameKind {
    /// Every kind, in catalog order.
    pub const ALL: [GameKind; 4] = [
        GameKind::Foosball,
        GameKind::Pong,
        GameKind::Chess,
        GameKind::Darts,
    ];

    /// The canonical lowercase name, as used in config and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foosball => "foosball",
            Self::Pong => "pong",
            Self::Chess => "chess",
            Self::Darts => "darts",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKind {
    type Err = ProtocolError;

    /// Parses a kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::UnknownKind(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The lifecycle state of a game slot.
///
/// ```text
/// Open ◄──── join/leave ────► Ready
///   │                           │
///   ├── roster == max ──────────┼──► Finished
///   ├── roster == 0 ────────────┼──► Empty
///   └── timer, roster < min     └──► Finished (timer, roster >= min)
///         │
///         ▼
///      Timeout
/// ```
///
/// - **Open**: fewer than `min` participants. Joinable.
/// - **Ready**: between `min` (inclusive) and `max` (exclusive). Joinable.
/// - **Finished**: `max` reached, or the timer fired with enough players.
/// - **Timeout**: the timer fired below `min`.
/// - **Empty**: everyone left.
///
/// The last three are terminal: the roster is frozen and the registry
/// sweep reclaims the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Open,
    Ready,
    Finished,
    Timeout,
    Empty,
}

impl GameState {
    /// Returns `true` if the game still accepts joins and leaves.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open | Self::Ready)
    }

    /// Returns `true` for `Finished`, `Timeout`, and `Empty`.
    pub fn is_terminal(&self) -> bool {
        !self.is_joinable()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Ready => write!(f, "Ready"),
            Self::Finished => write!(f, "Finished"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Empty => write!(f, "Empty"),
        }
    }
}

// ---------------------------------------------------------------------------
// GameEvent
// ---------------------------------------------------------------------------

/// A state-change notification emitted by a game.
///
/// Games emit one event per transition, synchronously and in order, plus one
/// per explicit re-trigger. The receiving sink turns it into something a
/// human sees; it has no way to write back into the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The game's identifier, or `None` if it has not been registered yet.
    pub game_id: Option<GameId>,
    /// The activity kind of the game.
    pub kind: GameKind,
    /// The state the game is now in.
    pub state: GameState,
    /// The rendered, human-readable message for this state.
    pub message: String,
    /// The roster at the moment of the event, in join order.
    pub roster: Vec<PlayerId>,
}

// =========================================================================
// Tests
// =========================================================================
