//! Sweeps terminal games out of the registry.

use rallypoint_protocol::GameId;

use crate::GameRegistry;

/// The result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Identifiers removed by this sweep.
    pub removed: Vec<GameId>,
    /// Entries left in the registry afterwards.
    pub remaining: usize,
}

/// Removes every registry entry whose game reached a terminal state.
///
/// The collector never touches the games themselves: by the time a game is
/// terminal its timer has already fired or been cancelled, so dropping the
/// registry's handle is all the teardown there is.
#[derive(Debug, Default)]
pub struct GarbageCollector {
    total_sweeps: u64,
    total_removed: u64,
}

impl GarbageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one sweep over `registry`. Never fails.
    pub fn sweep(&mut self, registry: &mut GameRegistry) -> SweepReport {
        let mut removed = Vec::new();

        for id in registry.ids() {
            let Some(game) = registry.get(&id) else {
                continue;
            };
            let state = game.lock().state();
            if state.is_terminal() {
                registry.remove(&id);
                tracing::info!(game_id = %id, %state, remaining = registry.len(), "deleting game");
                removed.push(id);
            }
        }

        self.total_sweeps += 1;
        self.total_removed += removed.len() as u64;

        tracing::info!(
            removed = removed.len(),
            remaining = registry.len(),
            sweep = self.total_sweeps,
            "registry sweep complete"
        );

        SweepReport {
            removed,
            remaining: registry.len(),
        }
    }

    /// Sweeps run so far.
    pub fn total_sweeps(&self) -> u64 {
        self.total_sweeps
    }

    /// Games removed across all sweeps.
    pub fn total_removed(&self) -> u64 {
        self.total_removed
    }
}
