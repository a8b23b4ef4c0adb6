//! Variant catalog: capacity, timeout, and wording for each game kind.

use std::collections::HashMap;
use std::time::Duration;

use rallypoint_protocol::{GameKind, GameState};
use serde::{Deserialize, Serialize};

use crate::LobbyError;

/// Default time a game waits for players before timing out.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Darts groups resolve faster than the other kinds.
pub const DARTS_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Longest timeout a variant may carry.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// ---------------------------------------------------------------------------
// Capacity
// ---------------------------------------------------------------------------

/// The participant window of a game: `min` to become `Ready`, `max` to
/// become `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub min: usize,
    pub max: usize,
}

impl Capacity {
    /// Creates a validated capacity window.
    ///
    /// # Errors
    /// Returns [`LobbyError::InvalidCapacity`] unless `1 <= min <= max`.
    pub fn new(min: usize, max: usize) -> Result<Self, LobbyError> {
        let capacity = Self { min, max };
        capacity.validate()?;
        Ok(capacity)
    }

    /// A window where `min == max == n`.
    pub fn exact(n: usize) -> Result<Self, LobbyError> {
        Self::new(n, n)
    }

    /// Checks `1 <= min <= max`.
    pub fn validate(&self) -> Result<(), LobbyError> {
        if self.min == 0 || self.min > self.max {
            return Err(LobbyError::InvalidCapacity {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// The transition table: the state a game with `players` participants
    /// is in, ignoring the timer.
    ///
    /// The order of the checks matters. A full roster wins over everything,
    /// so `{1, 1}` with one player is `Finished`, not `Ready`.
    pub fn state_for(&self, players: usize) -> GameState {
        if players == self.max {
            GameState::Finished
        } else if players < 1 {
            GameState::Empty
        } else if players < self.min {
            GameState::Open
        } else {
            GameState::Ready
        }
    }

    /// The state the timer resolves to for a given roster size.
    pub fn expired_state_for(&self, players: usize) -> GameState {
        if players < self.min {
            GameState::Timeout
        } else {
            GameState::Finished
        }
    }
}

// ---------------------------------------------------------------------------
// PhraseSet
// ---------------------------------------------------------------------------

/// The kind-specific wording plugged into the shared message scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSet {
    /// Emoji shortcode shown in front of messages, e.g. `:soccer:`.
    pub icon: String,
    /// The command users type to open a new game, e.g. `/football`.
    pub command: String,
    /// What the game is called in invitations, e.g. `table football`.
    pub title: String,
    /// What players get to do once it fills, e.g. `football`.
    pub activity: String,
}

impl PhraseSet {
    pub fn new(icon: &str, command: &str, title: &str, activity: &str) -> Self {
        Self {
            icon: icon.to_owned(),
            command: command.to_owned(),
            title: title.to_owned(),
            activity: activity.to_owned(),
        }
    }

    /// The standard wording for a kind.
    pub fn standard(kind: GameKind) -> Self {
        match kind {
            GameKind::Foosball => {
                Self::new(":soccer:", "/football", "table football", "football")
            }
            GameKind::Pong => Self::new(":joystick:", "/atari", "Atari pong", "pong"),
            GameKind::Chess => Self::new(":chess_pawn:", "/chess", "chess", "chess"),
            GameKind::Darts => Self::new(":dart:", "/darts", "darts", "darts"),
        }
    }
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Everything a kind contributes to a game: it is data, not behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub capacity: Capacity,
    /// `None` means the game never times out.
    pub timeout: Option<Duration>,
    pub phrases: PhraseSet,
}

impl Variant {
    /// The standard variant for a kind.
    pub fn standard(kind: GameKind) -> Self {
        let (min, max, timeout) = match kind {
            GameKind::Foosball => (4, 4, DEFAULT_TIMEOUT),
            GameKind::Pong => (2, 2, DEFAULT_TIMEOUT),
            GameKind::Chess => (2, 2, DEFAULT_TIMEOUT),
            GameKind::Darts => (2, 8, DARTS_TIMEOUT),
        };
        Self {
            capacity: Capacity { min, max },
            timeout: Some(timeout),
            phrases: PhraseSet::standard(kind),
        }
    }

    /// Checks the capacity window and bounds the timeout by [`MAX_TIMEOUT`].
    pub fn validate(&self) -> Result<(), LobbyError> {
        self.capacity.validate()?;
        match self.timeout {
            Some(timeout) if timeout > MAX_TIMEOUT => Err(LobbyError::InvalidTimeout {
                timeout,
                max: MAX_TIMEOUT,
            }),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// VariantCatalog
// ---------------------------------------------------------------------------

/// The fixed table from kind to variant.
///
/// A catalog may carry fewer than all kinds. Asking it for a missing kind
/// is a configuration error, not something to recover from per request.
#[derive(Debug, Clone, Default)]
pub struct VariantCatalog {
    variants: HashMap<GameKind, Variant>,
}

impl VariantCatalog {
    /// A catalog with no variants.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard catalog with every kind.
    pub fn standard() -> Self {
        GameKind::ALL
            .into_iter()
            .fold(Self::empty(), |catalog, kind| {
                catalog.with_variant(kind, Variant::standard(kind))
            })
    }

    /// Adds or replaces the variant for `kind`.
    pub fn with_variant(mut self, kind: GameKind, variant: Variant) -> Self {
        self.variants.insert(kind, variant);
        self
    }

    /// Drops `kind` from the catalog.
    pub fn without(mut self, kind: GameKind) -> Self {
        self.variants.remove(&kind);
        self
    }

    /// Looks up the variant for `kind`.
    ///
    /// # Errors
    /// Returns [`LobbyError::UnknownKind`] if the catalog does not carry it.
    pub fn variant(&self, kind: GameKind) -> Result<&Variant, LobbyError> {
        self.variants.get(&kind).ok_or(LobbyError::UnknownKind(kind))
    }

    pub fn variant_mut(&mut self, kind: GameKind) -> Option<&mut Variant> {
        self.variants.get_mut(&kind)
    }

    /// Returns `true` if the catalog carries `kind`.
    pub fn contains(&self, kind: GameKind) -> bool {
        self.variants.contains_key(&kind)
    }

    /// The kinds this catalog carries, in catalog order.
    pub fn kinds(&self) -> Vec<GameKind> {
        GameKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Checks every variant in the catalog.
    pub fn validate(&self) -> Result<(), LobbyError> {
        self.variants.values().try_for_each(Variant::validate)
    }
}
