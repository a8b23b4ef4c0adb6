//! The per-slot state machine.
//!
//! A [`Game`] owns its roster, its capacity window, and at most one expiry
//! timer. Every roster change re-evaluates the transition table in
//! [`Capacity::state_for`] before the call returns, and every state change
//! is reported to the [`EventSink`] exactly once, in order.
//!
//! Games are shared as [`SharedGame`] (`Arc<Mutex<Game>>`) so the expiry
//! timer can reach the game from its own task. The timer only holds a
//! `Weak` reference: once the registry drops a game, a pending timer finds
//! nothing to expire.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use rallypoint_protocol::{GameEvent, GameId, GameKind, GameState, PlayerId};
use rallypoint_timer::ExpiryTimer;

use crate::{Capacity, EventSink, GameMessages, LobbyError, PhraseSet};

/// A game shared between the registry, request handlers, and its timer.
pub type SharedGame = Arc<Mutex<Game>>;

/// Per-game rules fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub capacity: Capacity,
    /// `None` (or zero) means the game never times out.
    pub timeout: Option<Duration>,
    /// Reject a join from someone already in the roster.
    pub reject_duplicates: bool,
}

/// A point-in-time copy of a game's public state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub id: Option<GameId>,
    pub kind: GameKind,
    pub state: GameState,
    pub capacity: Capacity,
    pub creator: PlayerId,
    pub roster: Vec<PlayerId>,
    pub created_at: SystemTime,
    /// Time left on the expiry timer, if one is still armed.
    pub expires_in: Option<Duration>,
}

/// One activity slot.
pub struct Game {
    id: Option<GameId>,
    kind: GameKind,
    rules: GameRules,
    phrases: PhraseSet,
    creator: PlayerId,
    roster: Vec<PlayerId>,
    state: GameState,
    created_at: SystemTime,
    expiry: Option<ExpiryTimer>,
    sink: Arc<dyn EventSink>,
}

impl Game {
    /// Builds a game with `creator` as its first participant.
    ///
    /// The initial state comes straight from the transition table and is not
    /// emitted as an event; the caller announces new games itself. No timer
    /// is armed here, see [`Game::spawn`].
    ///
    /// # Errors
    /// Returns [`LobbyError::InvalidCapacity`] for a bad capacity window.
    pub fn new(
        kind: GameKind,
        rules: GameRules,
        phrases: PhraseSet,
        creator: PlayerId,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, LobbyError> {
        rules.capacity.validate()?;

        let roster = vec![creator.clone()];
        let state = rules.capacity.state_for(roster.len());

        tracing::info!(%kind, %creator, %state, "game created");

        Ok(Self {
            id: None,
            kind,
            rules,
            phrases,
            creator,
            roster,
            state,
            created_at: SystemTime::now(),
            expiry: None,
            sink,
        })
    }

    /// Builds a shared game and arms its expiry timer.
    ///
    /// The timer is armed only for a positive timeout and only if the game
    /// did not start out terminal (a `{1, 1}` game is born `Finished`).
    ///
    /// # Errors
    /// Returns [`LobbyError::Timer`] when a timer is needed but no Tokio
    /// runtime is running, or any error from [`Game::new`].
    pub fn spawn(
        kind: GameKind,
        rules: GameRules,
        phrases: PhraseSet,
        creator: PlayerId,
        sink: Arc<dyn EventSink>,
    ) -> Result<SharedGame, LobbyError> {
        let timeout = rules.timeout.filter(|t| !t.is_zero());
        let game = Arc::new(Mutex::new(Self::new(kind, rules, phrases, creator, sink)?));

        if let Some(after) = timeout {
            if game.lock().is_joinable() {
                let weak = Arc::downgrade(&game);
                let timer = ExpiryTimer::schedule(after, move || {
                    if let Some(game) = weak.upgrade() {
                        game.lock().expire();
                    }
                })?;
                game.lock().expiry = Some(timer);
            }
        }

        Ok(game)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The identifier, once the game has been registered.
    pub fn id(&self) -> Option<&GameId> {
        self.id.as_ref()
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn capacity(&self) -> Capacity {
        self.rules.capacity
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn creator(&self) -> &PlayerId {
        &self.creator
    }

    /// Participants in join order.
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Returns `true` while the game accepts joins and leaves.
    pub fn is_joinable(&self) -> bool {
        self.state.is_joinable()
    }

    /// Returns `true` while the expiry timer is waiting to fire.
    pub fn has_armed_timer(&self) -> bool {
        self.expiry.as_ref().is_some_and(ExpiryTimer::is_armed)
    }

    /// All messages, rendered for the current roster.
    pub fn messages(&self) -> GameMessages {
        GameMessages::render(&self.phrases, &self.creator, &self.roster)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.clone(),
            kind: self.kind,
            state: self.state,
            capacity: self.rules.capacity,
            creator: self.creator.clone(),
            roster: self.roster.clone(),
            created_at: self.created_at,
            expires_in: self
                .expiry
                .as_ref()
                .filter(|timer| timer.is_armed())
                .map(ExpiryTimer::remaining),
        }
    }

    /// Records the identifier the registry filed this game under.
    pub(crate) fn attach_id(&mut self, id: GameId) {
        self.id = Some(id);
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Adds a participant.
    ///
    /// Returns `false` if the game is terminal, or if `player` is already
    /// in the roster and duplicates are rejected.
    pub fn add_player(&mut self, player: PlayerId) -> bool {
        if !self.is_joinable() {
            tracing::debug!(game = %self.label(), %player, state = %self.state, "join rejected, game closed");
            return false;
        }
        if self.rules.reject_duplicates && self.roster.contains(&player) {
            tracing::debug!(game = %self.label(), %player, "join rejected, already in roster");
            return false;
        }

        self.roster.push(player);
        tracing::info!(
            game = %self.label(),
            player = %self.roster[self.roster.len() - 1],
            players = self.roster.len(),
            "player joined"
        );
        self.check_players();
        true
    }

    /// Removes every occurrence of a participant.
    ///
    /// Returns `false` only if the game is terminal. Removing someone who
    /// is not in the roster changes nothing and still returns `true`.
    pub fn remove_player(&mut self, player: &PlayerId) -> bool {
        if !self.is_joinable() {
            tracing::debug!(game = %self.label(), %player, state = %self.state, "leave rejected, game closed");
            return false;
        }

        let before = self.roster.len();
        self.roster.retain(|p| p != player);
        if self.roster.len() != before {
            tracing::info!(
                game = %self.label(),
                %player,
                players = self.roster.len(),
                "player left"
            );
            self.check_players();
        }
        true
    }

    /// Re-emits the event for the current state without changing anything.
    ///
    /// Used after a rejected join so the caller can refresh whatever it is
    /// showing for this game.
    pub fn trigger_state_callback(&self) {
        self.emit();
    }

    /// Resolves the game when its expiry timer fires.
    ///
    /// A no-op on a terminal game, since a cancel and a fire can land in the
    /// same tick. Returns `true` if the game transitioned.
    pub fn expire(&mut self) -> bool {
        if !self.is_joinable() {
            tracing::debug!(game = %self.label(), state = %self.state, "expiry ignored, game already closed");
            return false;
        }
        self.expiry = None;

        let next = self.rules.capacity.expired_state_for(self.roster.len());
        tracing::info!(
            game = %self.label(),
            players = self.roster.len(),
            state = %next,
            "game expired"
        );
        self.update_state(next);
        true
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_players(&mut self) {
        let next = self.rules.capacity.state_for(self.roster.len());
        if matches!(next, GameState::Finished | GameState::Empty) {
            self.cancel_expiry();
        }
        self.update_state(next);
    }

    fn cancel_expiry(&mut self) {
        if let Some(mut timer) = self.expiry.take() {
            if timer.cancel() {
                tracing::debug!(game = %self.label(), "expiry timer cancelled");
            }
        }
    }

    fn update_state(&mut self, next: GameState) {
        if next == self.state {
            return;
        }
        tracing::info!(game = %self.label(), from = %self.state, to = %next, "state changed");
        self.state = next;
        self.emit();
    }

    fn emit(&self) {
        let messages = self.messages();
        self.sink.emit(GameEvent {
            game_id: self.id.clone(),
            kind: self.kind,
            state: self.state,
            message: messages.for_state(self.state).to_owned(),
            roster: self.roster.clone(),
        });
    }

    fn label(&self) -> &str {
        self.id.as_ref().map_or("unregistered", GameId::as_str)
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("capacity", &self.rules.capacity)
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}
