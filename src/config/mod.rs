//! Project configuration for `framework.toml`.
//!
//! Values are layered, highest precedence first:
//!
//! | Source                 | Example                          |
//! |------------------------|----------------------------------|
//! | command-line flags     | `--store-url shop.myshopify.com` |
//! | environment variables  | `FRAMEWORK_STORE_URL=...`        |
//! | `framework.toml`       | `store_url = "..."`              |
//! | built-in defaults      | `shopify_api_version = "2023-04"`|
//!
//! # Example
//!
//! ```toml
//! store_url = "my-shop.myshopify.com"
//! theme_id = 123456789
//! access_token = "shpat_..."
//! development = true
//! vite_server_url = "http://localhost:5173"
//! ```

mod error;
mod util;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::liquid::CompileOptions;
use crate::log;
use crate::shopify::{DEFAULT_API_VERSION, DEFAULT_AUTH_HEADER, ThemeTarget};
use util::{expand_path, parse_bool, string_or_number};

/// Default config file, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "framework.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "FRAMEWORK_";

/// Keys that must be set before talking to the store.
const REQUIRED_REMOTE_KEYS: [&str; 3] = ["store_url", "theme_id", "access_token"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// File the values were read from, if any (internal use only).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Store domain, e.g. `my-shop.myshopify.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    /// Target theme. Accepts a TOML string or integer.
    #[serde(
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme_id: Option<String>,

    /// Admin API access token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Serve component assets from the dev server. Unset means the
    /// command's default (`watch`: on, `build`/`compile`: off).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development: Option<bool>,

    /// Dev server base URL used in development mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vite_server_url: Option<String>,

    /// Admin API version in the endpoint path.
    pub shopify_api_version: String,

    /// Header carrying `access_token`.
    pub auth_header: String,

    /// How long `watch` waits for queued operations on shutdown.
    pub drain_timeout_secs: u64,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            store_url: None,
            theme_id: None,
            access_token: None,
            development: None,
            vite_server_url: None,
            shopify_api_version: DEFAULT_API_VERSION.to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            drain_timeout_secs: 30,
        }
    }
}

impl FrameworkConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// A missing `framework.toml` is fine; a missing file named explicitly
    /// through `--config` or `FRAMEWORK_CONFIG` is not.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let explicit = cli
            .config
            .clone()
            .or_else(|| env(&env_key("config")).map(PathBuf::from))
            .map(|path| expand_path(&path));

        let mut config = match &explicit {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.clone())),
            Some(path) => Self::from_path(path)?,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_path(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(env)?;
        config.apply_cli(cli);

        if let Some(path) = &config.config_path {
            crate::debug!("config"; "using {}", path.display());
        }
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    #[cfg(test)]
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::parse_with_ignored(content)?.0)
    }

    /// Read and parse a config file, warning about unknown keys.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            log!("warning"; "unknown keys in {} are ignored: {}", path.display(), ignored.join(", "));
        }

        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse TOML content, collecting unknown keys.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply `FRAMEWORK_*` overrides. `lookup` resolves a variable name.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(&env_key(key)).filter(|value| !value.is_empty());

        Self::update_option(&mut self.store_url, get("store_url"));
        Self::update_option(&mut self.theme_id, get("theme_id"));
        Self::update_option(&mut self.access_token, get("access_token"));
        Self::update_option(&mut self.vite_server_url, get("vite_server_url"));

        if let Some(value) = get("development") {
            let parsed = parse_bool(&value).ok_or(ConfigError::Invalid {
                key: "development",
                value,
            })?;
            self.development = Some(parsed);
        }
        if let Some(value) = get("shopify_api_version") {
            self.shopify_api_version = value;
        }
        if let Some(value) = get("auth_header") {
            self.auth_header = value;
        }
        if let Some(value) = get("drain_timeout_secs") {
            self.drain_timeout_secs = value.parse().map_err(|_| ConfigError::Invalid {
                key: "drain_timeout_secs",
                value,
            })?;
        }
        Ok(())
    }

    /// Apply global command-line overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.store_url, cli.store_url.clone());
        Self::update_option(&mut self.theme_id, cli.theme_id.clone());
        Self::update_option(&mut self.access_token, cli.access_token.clone());
    }

    fn update_option(config_option: &mut Option<String>, override_value: Option<String>) {
        if override_value.is_some() {
            *config_option = override_value;
        }
    }

    /// Fail with every missing key needed to reach the store.
    pub fn require_remote(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = REQUIRED_REMOTE_KEYS
            .into_iter()
            .filter(|key| self.remote_value(key).is_none_or(str::is_empty))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(missing))
        }
    }

    fn remote_value(&self, key: &str) -> Option<&str> {
        match key {
            "store_url" => self.store_url.as_deref(),
            "theme_id" => self.theme_id.as_deref(),
            "access_token" => self.access_token.as_deref(),
            _ => None,
        }
        .map(str::trim)
    }

    /// Compiler view. `default_development` applies when the config leaves
    /// `development` unset.
    pub fn compile_options(&self, development: Option<bool>, default_development: bool) -> CompileOptions {
        CompileOptions {
            development: development
                .or(self.development)
                .unwrap_or(default_development),
            vite_server_url: self.vite_server_url.clone(),
        }
    }

    /// Remote client view. Requires [`require_remote`](Self::require_remote).
    pub fn theme_target(&self) -> Result<ThemeTarget, ConfigError> {
        self.require_remote()?;

        let store_url = self.store_url.as_deref().unwrap_or_default();
        let endpoint = crate::shopify::endpoint(store_url, &self.shopify_api_version)
            .map_err(|err| ConfigError::StoreUrl(store_url.to_string(), err))?;

        Ok(ThemeTarget {
            endpoint,
            theme_id: self.theme_id.clone().unwrap_or_default(),
            access_token: self.access_token.clone().unwrap_or_default(),
            auth_header: self.auth_header.clone(),
        })
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }

    /// Copy safe to print: the access token is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.access_token = config.access_token.as_deref().map(util::mask_secret);
        config
    }
}

/// Environment variable name for a config key.
pub fn env_key(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())
}

// ============================================================================
// tests
// ============================================================================
