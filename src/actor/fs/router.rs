use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::debouncer::{ChangeKind, is_temp_file};
use crate::actor::messages::SyncOp;
use crate::utils::path::asset_key;

/// Turns debounced changes into remote operations.
///
/// Keeps the set of asset keys present under `root`, so that a directory
/// removed or renamed away becomes one delete per asset it held.
pub(super) struct Router {
    root: PathBuf,
    known: BTreeSet<String>,
}

impl Router {
    /// Seed the known keys from the files currently under `root`.
    pub fn new(root: PathBuf) -> Self {
        let known = WalkDir::new(&root)
            .skip_hidden(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path())
            .filter(|path| !is_temp_file(path))
            .filter_map(|path| asset_key(&root, &path))
            .collect();
        Self { root, known }
    }

    /// Route one change. Paths outside `root` and directory upserts yield
    /// nothing.
    pub fn route(&mut self, path: &Path, kind: ChangeKind) -> Vec<SyncOp> {
        let Some(key) = asset_key(&self.root, path) else {
            crate::debug!("watch"; "ignored (outside theme): {}", path.display());
            return Vec::new();
        };

        match kind {
            ChangeKind::Upsert if path.is_dir() => Vec::new(),
            ChangeKind::Upsert => {
                self.known.insert(key.clone());
                vec![SyncOp::Upload {
                    key,
                    path: path.to_path_buf(),
                }]
            }
            ChangeKind::Remove => self.remove(key),
        }
    }

    fn remove(&mut self, key: String) -> Vec<SyncOp> {
        if self.known.remove(&key) {
            return vec![SyncOp::Delete { key }];
        }

        let prefix = format!("{key}/");
        let children: Vec<String> = self
            .known
            .range(prefix.clone()..)
            .take_while(|known| known.starts_with(&prefix))
            .cloned()
            .collect();

        // Never seen locally; the remote may still have it
        if children.is_empty() {
            return vec![SyncOp::Delete { key }];
        }

        crate::debug!("watch"; "directory {} removed ({} assets)", key, children.len());
        children
            .into_iter()
            .map(|key| {
                self.known.remove(&key);
                SyncOp::Delete { key }
            })
            .collect()
    }
}
