use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use rustc_hash::FxHashMap;

use crate::utils::path::normalize_path;

pub(super) const DEBOUNCE_MS: u64 = 100;

/// What the remote side should end up with for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    /// File exists locally: upload it.
    Upsert,
    /// File is gone (deleted or renamed away): delete it.
    Remove,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Pending {
    /// Receipt order of the first event in the current window
    seq: u64,
    pub(super) kind: ChangeKind,
    last_event: Instant,
}

/// Per-path debouncer.
///
/// Events for the same path are coalesced until the path has been quiet for
/// `DEBOUNCE_MS`; the latest intent wins. Ready paths are released in the
/// order their first event arrived.
pub(super) struct Debouncer {
    pub(super) changes: FxHashMap<PathBuf, Pending>,
    next_seq: u64,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            next_seq: 0,
        }
    }

    /// Add a notify event.
    ///
    /// Renames are split into their halves: the old name is removed and the
    /// new name is upserted. A rename of unknown direction is resolved by
    /// checking whether the path still exists.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        match event.kind {
            EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {}
            EventKind::Create(_) => self.record_all(&event.paths, ChangeKind::Upsert),
            EventKind::Remove(_) => self.record_all(&event.paths, ChangeKind::Remove),
            // Metadata-only changes (mtime/atime/chmod) carry no new content
            EventKind::Modify(ModifyKind::Metadata(_)) => {}
            EventKind::Modify(ModifyKind::Name(mode)) => self.add_rename(mode, &event.paths),
            EventKind::Modify(_) => self.record_all(&event.paths, ChangeKind::Upsert),
            // Access, Any, Other
            _ => {}
        }
    }

    fn add_rename(&mut self, mode: RenameMode, paths: &[PathBuf]) {
        match mode {
            RenameMode::From => self.record_all(paths, ChangeKind::Remove),
            RenameMode::To => self.record_all(paths, ChangeKind::Upsert),
            RenameMode::Both => {
                if let [from, to, ..] = paths {
                    self.record(from, ChangeKind::Remove);
                    self.record(to, ChangeKind::Upsert);
                }
            }
            _ => {
                for path in paths {
                    let kind = if path.exists() {
                        ChangeKind::Upsert
                    } else {
                        ChangeKind::Remove
                    };
                    self.record(path, kind);
                }
            }
        }
    }

    fn record_all(&mut self, paths: &[PathBuf], kind: ChangeKind) {
        for path in paths {
            self.record(path, kind);
        }
    }

    fn record(&mut self, path: &Path, kind: ChangeKind) {
        self.record_at(path, kind, Instant::now());
    }

    pub(super) fn record_at(&mut self, path: &Path, kind: ChangeKind, now: Instant) {
        if is_temp_file(path) {
            return;
        }
        let path = normalize_path(path);

        match self.changes.get_mut(&path) {
            Some(pending) => {
                if pending.kind != kind {
                    crate::debug!("watch"; "{}->{}: {}", pending.kind.label(), kind.label(), path.display());
                }
                pending.kind = kind;
                pending.last_event = now;
            }
            None => {
                crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
                let seq = self.next_seq;
                self.next_seq += 1;
                self.changes.insert(
                    path,
                    Pending {
                        seq,
                        kind,
                        last_event: now,
                    },
                );
            }
        }
    }

    /// Take the paths that have been quiet for the debounce window.
    pub(super) fn take_if_ready(&mut self) -> Vec<(PathBuf, ChangeKind)> {
        self.take_ready_at(Instant::now())
    }

    pub(super) fn take_ready_at(&mut self, now: Instant) -> Vec<(PathBuf, ChangeKind)> {
        let window = Duration::from_millis(DEBOUNCE_MS);
        let ready: Vec<PathBuf> = self
            .changes
            .iter()
            .filter(|(_, pending)| now.saturating_duration_since(pending.last_event) >= window)
            .map(|(path, _)| path.clone())
            .collect();

        let mut taken: Vec<(PathBuf, Pending)> = ready
            .into_iter()
            .filter_map(|path| self.changes.remove(&path).map(|pending| (path, pending)))
            .collect();
        taken.sort_by_key(|(_, pending)| pending.seq);

        taken.into_iter().map(|(path, pending)| (path, pending.kind)).collect()
    }

    /// Take everything regardless of timing (shutdown flush).
    pub(super) fn take_all(&mut self) -> Vec<(PathBuf, ChangeKind)> {
        let mut taken: Vec<_> = self.changes.drain().collect();
        taken.sort_by_key(|(_, pending)| pending.seq);
        taken.into_iter().map(|(path, pending)| (path, pending.kind)).collect()
    }

    /// Precise sleep duration until the next path becomes ready.
    pub(super) fn sleep_duration(&self) -> Duration {
        let window = Duration::from_millis(DEBOUNCE_MS);
        self.changes
            .values()
            .map(|pending| window.saturating_sub(pending.last_event.elapsed()))
            .min()
            .unwrap_or(Duration::from_secs(86400))
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
