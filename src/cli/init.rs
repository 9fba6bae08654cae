//! `framework init`: create a project skeleton.
//!
//! Existing files are never overwritten.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::watch::THEME_DIR;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::log;

/// Standard theme directory structure.
const THEME_DIRS: &[&str] = &[
    "assets",
    "config",
    "layout",
    "locales",
    "sections",
    "snippets",
    "templates",
];

const CONFIG_TEMPLATE: &str = r#"# Store to sync with (also FRAMEWORK_STORE_URL / --store-url)
store_url = "your-store.myshopify.com"

# Theme to upload into (also FRAMEWORK_THEME_ID / --theme-id)
# theme_id = 123456789

# Admin API access token. Prefer FRAMEWORK_ACCESS_TOKEN over committing it.
# access_token = "shpat_..."

# Component assets from the dev server (watch defaults to true, build to false)
# development = true
# vite_server_url = "http://localhost:3000"

# shopify_api_version = "2023-04"
"#;

/// Create `<directory>/theme/` and a starter `framework.toml`.
pub fn init_project(directory: &Path) -> Result<()> {
    create_structure(directory)?;

    let config_path = directory.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() {
        log!("init"; "{} already exists, left unchanged", config_path.display());
    } else {
        fs::write(&config_path, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write '{}'", config_path.display()))?;
    }

    log!("init"; "project initialized in {}", directory.display());
    Ok(())
}

/// Create theme directory structure under the given root.
fn create_structure(root: &Path) -> Result<()> {
    let theme = root.join(THEME_DIR);
    for dir in THEME_DIRS {
        let path = theme.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }
    Ok(())
}
