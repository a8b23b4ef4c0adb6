//! `LobbyServer` builder and sweep loop.
//!
//! The server owns the [`Lobby`] and the background task that sweeps
//! terminal games out of it. Inbound requests go straight to the lobby;
//! the server adds nothing on that path.

use std::sync::Arc;
use std::time::Duration;

use rallypoint_lobby::EventSink;
use rallypoint_timer::{SweepConfig, SweepScheduler};
use tokio::task::JoinHandle;

use crate::{Lobby, LobbyConfig, RallypointError};

/// Builder for configuring a [`LobbyServer`].
///
/// # Example
///
/// ```rust,ignore
/// use rallypoint::prelude::*;
///
/// let server = LobbyServer::builder()
///     .config(LobbyConfig::load("rallypoint.toml")?)
///     .build(events)?;
/// server.run().await
/// ```
pub struct LobbyServerBuilder {
    config: LobbyConfig,
    sweep_interval: Option<Duration>,
    sweep_jitter: Option<Duration>,
}

impl LobbyServerBuilder {
    /// Creates a new builder with the default config.
    pub fn new() -> Self {
        Self {
            config: LobbyConfig::default(),
            sweep_interval: None,
            sweep_jitter: None,
        }
    }

    /// Replaces the whole config.
    pub fn config(mut self, config: LobbyConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the time between sweeps, overriding the config's whole-second
    /// value. Zero disables sweeping.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Sets the random delay added to the first sweep.
    pub fn sweep_jitter(mut self, jitter: Duration) -> Self {
        self.sweep_jitter = Some(jitter);
        self
    }

    /// Builds the server. Games report their state changes to `sink`.
    ///
    /// # Errors
    /// Fails if the config produces an unusable variant catalog.
    pub fn build(self, sink: impl EventSink) -> Result<LobbyServer, RallypointError> {
        let lobby = Lobby::from_config(&self.config, sink)?;

        let interval = self
            .sweep_interval
            .unwrap_or_else(|| self.config.sweep_interval());
        let mut sweep = SweepConfig::every(interval);
        if let Some(jitter) = self.sweep_jitter {
            sweep.initial_jitter = jitter;
        }
        let sweep = sweep.validated();

        tracing::debug!(
            sweep_interval_ms = sweep.interval.as_millis() as u64,
            kinds = ?lobby.factory().catalog().kinds(),
            "lobby server built"
        );

        Ok(LobbyServer {
            lobby: Arc::new(lobby),
            sweep,
        })
    }
}

impl Default for LobbyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A lobby plus its periodic sweep.
pub struct LobbyServer {
    lobby: Arc<Lobby>,
    sweep: SweepConfig,
}

impl LobbyServer {
    /// Creates a new builder.
    pub fn builder() -> LobbyServerBuilder {
        LobbyServerBuilder::new()
    }

    /// Time between sweeps after clamping. Zero means sweeping is disabled.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep.interval
    }

    /// The lobby serving inbound requests.
    pub fn lobby(&self) -> &Arc<Lobby> {
        &self.lobby
    }

    /// Starts the sweep loop on a background task.
    ///
    /// The task runs until aborted. With a zero interval it never sweeps.
    pub fn spawn_collector(&self) -> JoinHandle<()> {
        let lobby = Arc::clone(&self.lobby);
        let sweep = self.sweep.clone();
        tokio::spawn(collector_loop(lobby, sweep))
    }

    /// Runs the sweep loop on the current task. Never returns.
    pub async fn run(self) -> Result<(), RallypointError> {
        tracing::info!("rallypoint lobby running");
        collector_loop(self.lobby, self.sweep).await;
        Ok(())
    }
}

async fn collector_loop(lobby: Arc<Lobby>, sweep: SweepConfig) {
    let mut scheduler = SweepScheduler::new(sweep);
    if scheduler.is_disabled() {
        tracing::info!("registry sweep disabled");
    }

    loop {
        let info = scheduler.wait_for_sweep().await;
        let report = lobby.sweep().await;
        tracing::debug!(
            sweep = info.sweep,
            late_by_ms = info.late_by.as_millis() as u64,
            removed = report.removed.len(),
            remaining = report.remaining,
            "collector pass done"
        );
    }
}
