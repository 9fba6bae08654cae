//! Path helpers shared by the watch driver and `build`.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to absolute form.
///
/// Canonicalizes when the path exists; otherwise (e.g. a file that was just
/// removed) joins relative paths onto the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Remote asset key for `path` under `root`: relative, `/`-separated.
///
/// Returns `None` when `path` is outside `root` or is `root` itself.
pub fn asset_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
