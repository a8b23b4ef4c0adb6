//! The registry of live games.
//!
//! A plain `HashMap`, not a concurrent one. The registry is owned by one
//! place (the lobby service) and guarded there; callers that need
//! find-then-join to be atomic hold that guard across both steps.

use std::collections::HashMap;

use rallypoint_protocol::{GameId, GameKind};

use crate::{LobbyError, SharedGame};

/// Maps game identifiers to live games.
#[derive(Default)]
pub struct GameRegistry {
    games: HashMap<GameId, SharedGame>,
    next_id: u64,
}

impl GameRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints an identifier not currently in use (`G-1`, `G-2`, ...).
    pub fn next_id(&mut self) -> GameId {
        loop {
            self.next_id += 1;
            let id = GameId(format!("G-{}", self.next_id));
            if !self.games.contains_key(&id) {
                return id;
            }
        }
    }

    /// Files `game` under `id` and stamps the identifier into it.
    ///
    /// # Errors
    /// Returns [`LobbyError::DuplicateId`] if `id` is already taken.
    pub fn insert(&mut self, id: GameId, game: SharedGame) -> Result<(), LobbyError> {
        if self.games.contains_key(&id) {
            return Err(LobbyError::DuplicateId(id));
        }

        let kind = {
            let mut guard = game.lock();
            guard.attach_id(id.clone());
            guard.kind()
        };
        tracing::info!(game_id = %id, %kind, total = self.games.len() + 1, "game registered");
        self.games.insert(id, game);
        Ok(())
    }

    /// Mints a fresh identifier and files `game` under it.
    pub fn register(&mut self, game: SharedGame) -> GameId {
        let id = self.next_id();
        game.lock().attach_id(id.clone());
        tracing::info!(game_id = %id, total = self.games.len() + 1, "game registered");
        self.games.insert(id.clone(), game);
        id
    }

    /// The first joinable game of `kind`, if any.
    ///
    /// A linear scan; the registry holds a handful of games at most.
    pub fn find_open_or_ready(&self, kind: GameKind) -> Option<(GameId, SharedGame)> {
        self.games.iter().find_map(|(id, game)| {
            let guard = game.lock();
            (guard.kind() == kind && guard.is_joinable())
                .then(|| (id.clone(), SharedGame::clone(game)))
        })
    }

    pub fn get(&self, id: &GameId) -> Option<SharedGame> {
        self.games.get(id).cloned()
    }

    /// Removes an entry. A no-op for an unknown `id`.
    pub fn remove(&mut self, id: &GameId) -> Option<SharedGame> {
        self.games.remove(id)
    }

    pub fn contains(&self, id: &GameId) -> bool {
        self.games.contains_key(id)
    }

    /// A snapshot of every identifier currently registered.
    pub fn ids(&self) -> Vec<GameId> {
        self.games.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
