use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::oneshot;

use crate::actor::fs::FsActor;
use crate::actor::sync::{SyncActor, SyncStats};
use crate::shopify::RemoteTheme;

/// Run both actors until shutdown (or until the watcher exits on its own).
///
/// Shutdown order: stop the watcher (which flushes pending changes and drops
/// its sender), then let the sync queue empty. The whole sequence is bounded
/// by `drain_timeout`; whatever is still queued after that is abandoned.
pub(super) async fn run_actors<R: RemoteTheme>(
    fs: FsActor,
    sync: SyncActor<R>,
    shutdown_rx: Option<Receiver<()>>,
    drain_timeout: Duration,
) -> Result<Option<SyncStats>> {
    let (stop_tx, stop_rx) = oneshot::channel();

    let mut sync_handle = tokio::spawn(async move { sync.run().await });
    let fs_handle = tokio::spawn(async move { fs.run(stop_rx).await });

    let mut fs_handle = match shutdown_rx {
        Some(rx) => {
            loop {
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                if fs_handle.is_finished() {
                    crate::log!("watch"; "watcher stopped unexpectedly");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let _ = stop_tx.send(());
            Some(fs_handle)
        }
        // No signal: the watcher runs until the sync side goes away
        None => {
            fs_handle.await?;
            drop(stop_tx);
            None
        }
    };

    crate::debug!("actor"; "draining sync queue");
    let drain = async {
        if let Some(handle) = fs_handle.as_mut() {
            handle.await?;
        }
        Ok::<_, anyhow::Error>((&mut sync_handle).await?)
    };
    let drained = tokio::time::timeout(drain_timeout, drain).await;

    match drained {
        Ok(stats) => Ok(Some(stats?)),
        Err(_) => {
            if let Some(handle) = &fs_handle {
                handle.abort();
            }
            sync_handle.abort();
            crate::log!(
                "sync";
                "pending operations abandoned after {:.1}s",
                drain_timeout.as_secs_f64()
            );
            Ok(None)
        }
    }
}
