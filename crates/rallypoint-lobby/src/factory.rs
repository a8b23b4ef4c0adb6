//! Builds games from the variant catalog.

use std::sync::Arc;
use std::time::Duration;

use rallypoint_protocol::{GameKind, PlayerId};

use crate::{EventSink, Game, GameRules, LobbyError, SharedGame, VariantCatalog};

/// Instantiates the shared state machine with a kind's variant data.
#[derive(Debug, Clone)]
pub struct GameFactory {
    catalog: VariantCatalog,
    reject_duplicates: bool,
}

impl GameFactory {
    /// Creates a factory over a validated catalog.
    ///
    /// Duplicate joins are rejected by default.
    ///
    /// # Errors
    /// Returns [`LobbyError::InvalidCapacity`] if any variant is malformed.
    pub fn new(catalog: VariantCatalog) -> Result<Self, LobbyError> {
        catalog.validate()?;
        Ok(Self {
            catalog,
            reject_duplicates: true,
        })
    }

    /// Sets whether games built by this factory reject duplicate joins.
    pub fn reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    /// Builds and arms a new game of `kind` with `creator` in it.
    ///
    /// `timeout_override` replaces the variant's timeout; `Some(Duration::ZERO)`
    /// disables the timer.
    ///
    /// # Errors
    /// - [`LobbyError::UnknownKind`] if the catalog lacks `kind`
    /// - [`LobbyError::Timer`] if a timer is needed outside a Tokio runtime
    pub fn create(
        &self,
        kind: GameKind,
        creator: PlayerId,
        sink: Arc<dyn EventSink>,
        timeout_override: Option<Duration>,
    ) -> Result<SharedGame, LobbyError> {
        let variant = self.catalog.variant(kind)?;
        let rules = GameRules {
            capacity: variant.capacity,
            timeout: timeout_override.or(variant.timeout),
            reject_duplicates: self.reject_duplicates,
        };
        Game::spawn(kind, rules, variant.phrases.clone(), creator, sink)
    }
}
