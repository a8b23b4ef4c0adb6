//! # Rallypoint
//!
//! Self-resolving group activity slots. Someone asks for a game of
//! foosball; others join until the table is full; the slot closes itself
//! when it fills, empties, or times out. Nobody has to moderate it.
//!
//! The crate ties the layers together:
//!
//! - [`Lobby`] — create-or-join, join, leave, and sweep behind one lock
//! - [`LobbyConfig`] — capacity, timeout, and sweep settings from TOML
//! - [`LobbyServer`] — owns the lobby and runs the periodic sweep
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rallypoint::prelude::*;
//!
//! # async fn demo() -> Result<(), RallypointError> {
//! let (events, _rx) = tokio::sync::mpsc::unbounded_channel::<GameEvent>();
//! let server = LobbyServer::builder().build(events)?;
//! let _collector = server.spawn_collector();
//!
//! let _outcome = server
//!     .lobby()
//!     .create_or_join(GameKind::Foosball, PlayerId::new("U123"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod lobby;
mod server;

pub use config::{LobbyConfig, VariantOverride};
pub use error::RallypointError;
pub use lobby::{JoinDisposition, JoinOutcome, Lobby};
pub use server::{LobbyServer, LobbyServerBuilder};

/// Installs a `tracing` subscriber that honors `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everything needed to run a lobby.
pub mod prelude {
    pub use crate::{
        JoinDisposition, JoinOutcome, Lobby, LobbyConfig, LobbyServer, RallypointError,
        init_tracing,
    };
    pub use rallypoint_lobby::{EventSink, GameMessages, GameSnapshot, NullSink, SweepReport};
    pub use rallypoint_protocol::{GameEvent, GameId, GameKind, GameState, PlayerId};
}
