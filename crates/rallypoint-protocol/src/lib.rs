//! Shared vocabulary for Rallypoint.
//!
//! Every other crate in the workspace speaks in these types:
//!
//! - **Identities** ([`PlayerId`], [`GameId`]) — who is playing, and which
//!   game slot they are in.
//! - **Kinds** ([`GameKind`]) — the closed set of activities a slot can be
//!   opened for.
//! - **States** ([`GameState`]) — where a slot is in its lifecycle.
//! - **Events** ([`GameEvent`]) — what a game reports to the outside world
//!   when its state changes.
//!
//! # Architecture
//!
//! ```text
//! Lobby service (rallypoint) → Lobby core (rallypoint-lobby) → Protocol (this crate)
//! ```
//!
//! Nothing here knows about timers, registries, or delivery. These are plain
//! data types with serde support so a notification sink can forward them.

mod error;
mod types;

pub use error::ProtocolError;
pub use types::{GameEvent, GameId, GameKind, GameState, PlayerId};
