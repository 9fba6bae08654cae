//! FileSystem Actor
//!
//! Watches `theme/` and sends debounced operations to the SyncActor.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (per-path timing) → Router (path → SyncOp) → SyncActor
//! ```

use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};

use super::messages::SyncOp;

// Per-path timing and coalescing.
mod debouncer;
// Debounced change -> SyncOp(s).
mod router;

#[cfg(test)]
mod tests;

use debouncer::{ChangeKind, Debouncer};
use router::Router;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (dropped when the actor stops)
    watcher: RecommendedWatcher,
    /// Maps changes under the normalized `theme/` directory to operations
    router: Router,
    /// Channel to send operations to SyncActor
    sync_tx: mpsc::Sender<SyncOp>,
    /// Debouncer state
    debouncer: Debouncer,
}

impl FsActor {
    /// Create the actor and start watching `root` immediately.
    ///
    /// Events are buffered in the notify channel until [`run`](Self::run).
    pub fn new(root: PathBuf, sync_tx: mpsc::Sender<SyncOp>) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok(Self {
            notify_rx,
            watcher,
            router: Router::new(root),
            sync_tx,
            debouncer: Debouncer::new(),
        })
    }

    /// Run the actor event loop until `stop` fires.
    ///
    /// On stop, pending changes are flushed without waiting for the debounce
    /// window and the sender to SyncActor is dropped.
    pub async fn run(self, mut stop: oneshot::Receiver<()>) {
        let notify_rx = self.notify_rx;
        let sync_tx = self.sync_tx;
        let mut router = self.router;
        let mut debouncer = self.debouncer;
        let watcher = self.watcher;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => {
                    // Stop accepting new events before flushing
                    drop(watcher);
                    while let Ok(event) = async_rx.try_recv() {
                        debouncer.add_event(&event);
                    }
                    let pending = debouncer.take_all();
                    crate::debug!("watch"; "flushing {} pending change(s)", pending.len());
                    let _ = dispatch(pending, &mut router, &sync_tx).await;
                    break;
                }
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    if dispatch(debouncer.take_if_ready(), &mut router, &sync_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Route debounced changes and forward them in order.
///
/// Returns `Err(())` if SyncActor shut down
async fn dispatch(
    changes: Vec<(PathBuf, ChangeKind)>,
    router: &mut Router,
    sync_tx: &mpsc::Sender<SyncOp>,
) -> Result<(), ()> {
    for (path, kind) in changes {
        for op in router.route(&path, kind) {
            crate::debug!("watch"; "{} {}", op.label(), op.key());
            sync_tx.send(op).await.map_err(|_| ())?;
        }
    }
    Ok(())
}
