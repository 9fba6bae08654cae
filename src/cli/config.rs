//! `framework config`: print the effective configuration.

use std::io::{Write, stdout};

use anyhow::Result;

use crate::config::FrameworkConfig;

pub fn print_config(config: &FrameworkConfig) -> Result<()> {
    let mut stdout = stdout().lock();
    stdout.write_all(render(config)?.as_bytes())?;
    Ok(())
}

/// Effective configuration as TOML, access token masked.
fn render(config: &FrameworkConfig) -> Result<String> {
    let body = toml::to_string_pretty(&config.redacted())?;
    Ok(match &config.config_path {
        Some(path) => format!("# {}\n{body}", path.display()),
        None => format!("# defaults (no config file)\n{body}"),
    })
}
