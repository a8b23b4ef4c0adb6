//! Error types for the protocol layer.
//!
//! Each crate in Rallypoint defines its own error enum. A `ProtocolError`
//! always means the input could not be turned into one of the shared types.

/// Errors that can occur while interpreting protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A game kind name did not match any known kind.
    ///
    /// Kind names come from the outside (slash commands, config files),
    /// so this is the one place where an unknown kind can show up.
    #[error("unknown game kind: {0}")]
    UnknownKind(String),
}
