//! The lobby service: the inbound operations of the game system.
//!
//! The lobby owns the registry and the collector behind one async mutex.
//! `create_or_join` holds it across the whole find-then-join or
//! create-then-insert sequence, which is what keeps at most one open game
//! per kind on a multi-threaded runtime. Per-game mutations take the game's
//! own lock (registry lock first, then game lock, never the reverse).

use std::sync::Arc;

use rallypoint_lobby::{
    EventSink, GameFactory, GameMessages, GameRegistry, GameSnapshot, GarbageCollector,
    SweepReport,
};
use rallypoint_protocol::{GameId, GameKind, PlayerId};
use tokio::sync::Mutex;

use crate::{LobbyConfig, RallypointError};

/// How a create-or-join request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDisposition {
    /// No open game of the kind existed; a new one was opened.
    Created,
    /// The requester joined the existing open game.
    Joined,
    /// The requester was already in the open game.
    AlreadyQueued,
}

/// The result of [`Lobby::create_or_join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The game the requester is now associated with.
    pub game_id: GameId,
    pub disposition: JoinDisposition,
}

struct LobbyState {
    registry: GameRegistry,
    collector: GarbageCollector,
}

/// Creates, joins, leaves, and sweeps games.
pub struct Lobby {
    state: Mutex<LobbyState>,
    factory: GameFactory,
    sink: Arc<dyn EventSink>,
}

impl Lobby {
    /// Creates an empty lobby.
    pub fn new(factory: GameFactory, sink: impl EventSink) -> Self {
        Self {
            state: Mutex::new(LobbyState {
                registry: GameRegistry::new(),
                collector: GarbageCollector::new(),
            }),
            factory,
            sink: Arc::new(sink),
        }
    }

    /// Creates an empty lobby from a config.
    pub fn from_config(config: &LobbyConfig, sink: impl EventSink) -> Result<Self, RallypointError> {
        Ok(Self::new(config.factory()?, sink))
    }

    /// Joins the open game of `kind`, or opens one.
    ///
    /// If the requester is already in the open game, nothing changes: they
    /// stay associated with it and the game re-emits its current state so
    /// the caller can refresh its display. A second open game of the same
    /// kind is never created.
    ///
    /// # Errors
    /// Only configuration problems: a kind missing from the catalog, or a
    /// timer that cannot be armed.
    pub async fn create_or_join(
        &self,
        kind: GameKind,
        requester: PlayerId,
    ) -> Result<JoinOutcome, RallypointError> {
        let mut state = self.state.lock().await;

        if let Some((game_id, game)) = state.registry.find_open_or_ready(kind) {
            let mut game = game.lock();
            if game.add_player(requester.clone()) {
                tracing::info!(%game_id, %kind, player = %requester, "joined existing game");
                return Ok(JoinOutcome {
                    game_id,
                    disposition: JoinDisposition::Joined,
                });
            }
            // Still open means the requester was already in it. Otherwise
            // the timer closed it between the lookup and the join, and a
            // fresh game is the right answer.
            if game.is_joinable() {
                tracing::debug!(%game_id, %kind, player = %requester, "requester already queued");
                game.trigger_state_callback();
                return Ok(JoinOutcome {
                    game_id,
                    disposition: JoinDisposition::AlreadyQueued,
                });
            }
        }

        let game = self
            .factory
            .create(kind, requester.clone(), Arc::clone(&self.sink), None)?;
        let game_id = state.registry.register(game);
        tracing::info!(%game_id, %kind, creator = %requester, "opened new game");

        Ok(JoinOutcome {
            game_id,
            disposition: JoinDisposition::Created,
        })
    }

    /// Adds `player` to a specific game.
    ///
    /// Returns `None` for an unknown game, otherwise whether the join was
    /// accepted. A rejected join re-emits the game's current state.
    pub async fn join(&self, game_id: &GameId, player: PlayerId) -> Option<bool> {
        let Some(game) = self.state.lock().await.registry.get(game_id) else {
            tracing::warn!(%game_id, %player, "join request for a game that does not exist");
            return None;
        };

        let mut game = game.lock();
        let accepted = game.add_player(player);
        if !accepted {
            game.trigger_state_callback();
        }
        Some(accepted)
    }

    /// Removes `player` from a specific game.
    ///
    /// Returns `None` for an unknown game, otherwise `false` only if the
    /// game was already closed.
    pub async fn leave(&self, game_id: &GameId, player: &PlayerId) -> Option<bool> {
        let Some(game) = self.state.lock().await.registry.get(game_id) else {
            tracing::warn!(%game_id, %player, "leave request for a game that does not exist");
            return None;
        };

        let removed = game.lock().remove_player(player);
        Some(removed)
    }

    /// A copy of a game's current state.
    pub async fn snapshot(&self, game_id: &GameId) -> Option<GameSnapshot> {
        let game = self.state.lock().await.registry.get(game_id)?;
        let snapshot = game.lock().snapshot();
        Some(snapshot)
    }

    /// A game's messages, rendered for its current roster.
    pub async fn messages(&self, game_id: &GameId) -> Option<GameMessages> {
        let game = self.state.lock().await.registry.get(game_id)?;
        let messages = game.lock().messages();
        Some(messages)
    }

    /// Removes every terminal game from the registry.
    pub async fn sweep(&self) -> SweepReport {
        let mut state = self.state.lock().await;
        let LobbyState {
            registry,
            collector,
        } = &mut *state;
        collector.sweep(registry)
    }

    /// Number of games in the registry, terminal ones included until swept.
    pub async fn game_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// Identifiers of every registered game.
    pub async fn game_ids(&self) -> Vec<GameId> {
        self.state.lock().await.registry.ids()
    }

    pub fn factory(&self) -> &GameFactory {
        &self.factory
    }
}
