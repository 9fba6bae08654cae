//! `framework watch`: sync theme/ to the store on every change.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::actor::{Coordinator, SyncStats};
use crate::config::FrameworkConfig;
use crate::shopify::ShopifyClient;
use crate::utils::path::normalize_path;
use crate::{core, log};

/// Directory under the project root holding theme sources.
pub const THEME_DIR: &str = "theme";

/// Locate `<directory>/theme`. Missing is fatal.
pub fn theme_root(directory: &Path) -> Result<PathBuf> {
    let root = directory.join(THEME_DIR);
    if !root.is_dir() {
        bail!(
            "no `{}/` directory found in `{}` (run `framework init` to create one)",
            THEME_DIR,
            directory.display()
        );
    }
    Ok(normalize_path(&root))
}

/// Watch until Ctrl+C, then drain queued operations.
pub fn watch_theme(directory: &Path, config: &FrameworkConfig, development: Option<bool>) -> Result<()> {
    let theme_root = theme_root(directory)?;
    let client = ShopifyClient::new(config.theme_target()?)?;
    let target = client.target();
    let options = config.compile_options(development, true);

    log!(
        "watch";
        "{} -> theme {} on {} ({} mode)",
        theme_root.display(),
        target.theme_id,
        target.endpoint.host_str().unwrap_or_default(),
        if options.development { "development" } else { "production" }
    );

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    core::register_shutdown(shutdown_tx);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let coordinator = Coordinator::new(theme_root, client, options)
        .with_drain_timeout(config.drain_timeout())
        .with_shutdown_signal(shutdown_rx);
    let stats = rt.block_on(coordinator.run())?;

    if let Some(stats) = stats {
        report(&stats);
    }

    if !core::is_shutdown() {
        bail!("file watcher stopped");
    }
    Ok(())
}

fn report(stats: &SyncStats) {
    if stats.total() == 0 {
        return;
    }
    log!(
        "sync";
        "{} uploaded, {} deleted, {} skipped, {} failed",
        stats.uploaded,
        stats.deleted,
        stats.skipped,
        stats.failed
    );
}
