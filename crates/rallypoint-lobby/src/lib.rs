//! Game slot lifecycle for Rallypoint.
//!
//! A game slot is opened by one requester, filled by others, and resolved
//! on its own: filled, emptied, or timed out. This crate holds the pieces
//! that make that happen.
//!
//! # Key types
//!
//! - [`Game`] — the per-slot state machine (roster, capacity, expiry timer)
//! - [`VariantCatalog`] — capacity, timeout, and wording per [`GameKind`]
//! - [`GameFactory`] — builds a [`Game`] from a kind and a creator
//! - [`GameRegistry`] — all live games, keyed by [`GameId`]
//! - [`GarbageCollector`] — sweeps terminal games out of the registry
//! - [`EventSink`] — where games report their state changes
//!
//! [`GameKind`]: rallypoint_protocol::GameKind
//! [`GameId`]: rallypoint_protocol::GameId

mod catalog;
mod collector;
mod error;
mod factory;
mod game;
mod messages;
mod registry;
mod sink;

pub use catalog::{Capacity, MAX_TIMEOUT, PhraseSet, Variant, VariantCatalog};
pub use collector::{GarbageCollector, SweepReport};
pub use error::LobbyError;
pub use factory::GameFactory;
pub use game::{Game, GameRules, GameSnapshot, SharedGame};
pub use messages::GameMessages;
pub use registry::GameRegistry;
pub use sink::{EventSink, NullSink};
