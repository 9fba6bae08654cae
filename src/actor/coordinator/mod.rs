//! Actor Coordinator - Wires up the Watch Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires up actors
//! - Runs them until shutdown, then drains the queue

mod runtime;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::SyncOp;
use super::sync::{SyncActor, SyncStats};
use crate::liquid::CompileOptions;
use crate::shopify::RemoteTheme;

const CHANNEL_BUFFER: usize = 64;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator<R: RemoteTheme> {
    theme_root: PathBuf,
    remote: R,
    options: CompileOptions,
    drain_timeout: Duration,
    shutdown_rx: Option<Receiver<()>>,
}

impl<R: RemoteTheme> Coordinator<R> {
    /// Create for a normalized `theme/` directory.
    pub fn new(theme_root: PathBuf, remote: R, options: CompileOptions) -> Self {
        Self {
            theme_root,
            remote,
            options,
            drain_timeout: Duration::from_secs(30),
            shutdown_rx: None,
        }
    }

    /// Upper bound on waiting for queued operations after shutdown.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    ///
    /// Returns the sync counters, or `None` if the queue did not drain in
    /// time.
    pub async fn run(self) -> Result<Option<SyncStats>> {
        let (sync_tx, sync_rx) = mpsc::channel::<SyncOp>(CHANNEL_BUFFER);

        let fs_actor = FsActor::new(self.theme_root.clone(), sync_tx)
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let sync_actor = SyncActor::new(sync_rx, self.remote, self.options);

        crate::debug!("actor"; "start");
        let stats = runtime::run_actors(
            fs_actor,
            sync_actor,
            self.shutdown_rx,
            self.drain_timeout,
        )
        .await?;

        crate::debug!("actor"; "stopped");
        Ok(stats)
    }
}
