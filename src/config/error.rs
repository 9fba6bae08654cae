//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("config file `{0}` not found")]
    NotFound(PathBuf),

    #[error(
        "missing required configuration: {}\n  hint: set them in framework.toml, as FRAMEWORK_* environment variables, or with --store-url / --theme-id / --access-token",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),

    #[error("invalid value `{value}` for `{key}`")]
    Invalid { key: &'static str, value: String },

    #[error("invalid store_url `{0}`")]
    StoreUrl(String, #[source] url::ParseError),
}
