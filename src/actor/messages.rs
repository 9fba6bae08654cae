//! Actor Message Definitions
//!
//! ```text
//! FsActor --SyncOp--> SyncActor
//! ```

use std::path::PathBuf;

/// One remote operation, keyed by the asset path relative to `theme/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    /// Compile (if needed) and upload the file at `path` under `key`.
    Upload { key: String, path: PathBuf },
    /// Delete the remote asset under `key`.
    Delete { key: String },
}

impl SyncOp {
    pub fn key(&self) -> &str {
        match self {
            Self::Upload { key, .. } | Self::Delete { key } => key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload { .. } => "upload",
            Self::Delete { .. } => "delete",
        }
    }
}
