//! Lobby configuration, loaded once at startup.
//!
//! ```toml
//! sweep_interval_secs = 3600
//! reject_duplicate_joins = true
//! disabled_kinds = ["darts"]
//!
//! [variants.foosball]
//! min_players = 4
//! max_players = 4
//! timeout_secs = 3600
//! ```
//!
//! Every field is optional. Missing fields fall back to the standard
//! catalog and a one-hour sweep.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use rallypoint_lobby::{Capacity, GameFactory, LobbyError, VariantCatalog};
use rallypoint_protocol::GameKind;
use serde::{Deserialize, Serialize};

use crate::RallypointError;

/// Top-level lobby configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// Seconds between registry sweeps. 0 disables sweeping.
    pub sweep_interval_secs: u64,
    /// Reject a join from someone already in the game's roster.
    pub reject_duplicate_joins: bool,
    /// Kinds that cannot be opened at all.
    pub disabled_kinds: Vec<GameKind>,
    /// Per-kind overrides, keyed by kind name (`foosball`, `darts`, ...).
    pub variants: BTreeMap<String, VariantOverride>,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60 * 60,
            reject_duplicate_joins: true,
            disabled_kinds: Vec::new(),
            variants: BTreeMap::new(),
        }
    }
}

/// Overrides for one kind's standard variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantOverride {
    pub min_players: Option<usize>,
    pub max_players: Option<usize>,
    /// Seconds before an unfilled game resolves. 0 disables the timer.
    pub timeout_secs: Option<u64>,
}

impl LobbyConfig {
    /// Parses a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, RallypointError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RallypointError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "lobby config loaded");
        Ok(config)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Builds the variant catalog: the standard one, with overrides applied
    /// and disabled kinds removed.
    ///
    /// # Errors
    /// - [`RallypointError::Protocol`] for an override keyed by an unknown kind
    /// - [`RallypointError::Lobby`] if an override leaves an invalid capacity
    ///   or a timeout above [`MAX_TIMEOUT`](rallypoint_lobby::MAX_TIMEOUT)
    pub fn catalog(&self) -> Result<VariantCatalog, RallypointError> {
        let mut catalog = VariantCatalog::standard();

        for (name, over) in &self.variants {
            let kind: GameKind = name.parse()?;
            let variant = catalog
                .variant_mut(kind)
                .ok_or(LobbyError::UnknownKind(kind))?;
            variant.capacity = Capacity {
                min: over.min_players.unwrap_or(variant.capacity.min),
                max: over.max_players.unwrap_or(variant.capacity.max),
            };
            if let Some(secs) = over.timeout_secs {
                variant.timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
        }

        for kind in &self.disabled_kinds {
            catalog = catalog.without(*kind);
        }

        catalog.validate()?;
        Ok(catalog)
    }

    /// Builds a game factory from this config.
    pub fn factory(&self) -> Result<GameFactory, RallypointError> {
        Ok(GameFactory::new(self.catalog()?)?.reject_duplicates(self.reject_duplicate_joins))
    }
}
