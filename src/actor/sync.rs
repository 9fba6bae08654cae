//! Sync Actor
//!
//! Applies [`SyncOp`]s to the remote theme one at a time, in the order they
//! were received. Serial application keeps uploads and deletes for the same
//! key in event order.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tokio::sync::mpsc;

use super::messages::SyncOp;
use crate::liquid::{self, CompileOptions, Diagnostic};
use crate::logger::{status_error, status_success, status_warning};
use crate::shopify::{RemoteError, RemoteTheme};

/// Counters reported when the actor stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub uploaded: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncStats {
    pub fn total(&self) -> usize {
        self.uploaded + self.deleted + self.skipped + self.failed
    }
}

/// Why a changed file was not uploaded.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("not valid UTF-8")]
    NotUtf8,

    #[error("{}", join_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Produce the content to upload for `path`.
///
/// Templates go through the compiler; anything else is sent verbatim.
pub fn prepare(path: &Path, options: &CompileOptions) -> Result<String, SkipReason> {
    let bytes = fs::read(path)?;
    let source = String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)?;

    if !liquid::is_template(path) {
        return Ok(source);
    }

    let compiled = liquid::compile_source(&source, options);
    if compiled.has_errors() {
        return Err(SkipReason::Diagnostics(compiled.errors().cloned().collect()));
    }
    for warning in compiled.warnings() {
        status_warning(&format!("{}: {}", path.display(), warning));
    }
    Ok(compiled.output)
}

/// Error text shown under a failed operation.
fn failure_detail(err: &RemoteError) -> String {
    match err.status() {
        Some(401 | 403) => format!("{err}\nhint: check access_token and theme_id"),
        _ => err.to_string(),
    }
}

/// Sync Actor - owns the remote client
pub struct SyncActor<R: RemoteTheme> {
    rx: mpsc::Receiver<SyncOp>,
    remote: R,
    options: CompileOptions,
    stats: SyncStats,
}

impl<R: RemoteTheme> SyncActor<R> {
    pub fn new(rx: mpsc::Receiver<SyncOp>, remote: R, options: CompileOptions) -> Self {
        Self {
            rx,
            remote,
            options,
            stats: SyncStats::default(),
        }
    }

    /// Apply operations until every sender is dropped.
    pub async fn run(mut self) -> SyncStats {
        while let Some(op) = self.rx.recv().await {
            self.apply(op).await;
        }
        crate::debug!("sync"; "queue closed after {} operation(s)", self.stats.total());
        self.stats
    }

    async fn apply(&mut self, op: SyncOp) {
        match op {
            SyncOp::Upload { key, path } => self.upload(&key, &path).await,
            SyncOp::Delete { key } => self.delete(&key).await,
        }
    }

    async fn upload(&mut self, key: &str, path: &Path) {
        let content = match prepare(path, &self.options) {
            Ok(content) => content,
            // Removed again before we got to it; the delete follows.
            Err(SkipReason::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                crate::debug!("sync"; "skip {}: file vanished", key);
                self.stats.skipped += 1;
                return;
            }
            Err(reason) => {
                status_error(&format!("skipped {key}"), &reason.to_string());
                self.stats.skipped += 1;
                return;
            }
        };

        match self.remote.upload(key, &content).await {
            Ok(()) => {
                status_success(&format!("uploaded {key}"));
                self.stats.uploaded += 1;
            }
            Err(err) => {
                status_error(&format!("failed to upload {key}"), &failure_detail(&err));
                self.stats.failed += 1;
            }
        }
    }

    async fn delete(&mut self, key: &str) {
        match self.remote.delete(key).await {
            Ok(()) => {
                status_success(&format!("deleted {key}"));
                self.stats.deleted += 1;
            }
            Err(err) => {
                status_error(&format!("failed to delete {key}"), &failure_detail(&err));
                self.stats.failed += 1;
            }
        }
    }
}
