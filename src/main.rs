//! Framework - compile component-island Liquid themes and sync them to Shopify.

mod actor;
mod cli;
mod config;
mod core;
mod liquid;
mod logger;
mod shopify;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::FrameworkConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = FrameworkConfig::load(&cli)?;
    if cli.requires_remote() {
        config.require_remote()?;
    }

    match &cli.command {
        Commands::Watch { directory, mode } => {
            cli::watch::watch_theme(directory, &config, mode.resolve())
        }
        Commands::Build {
            directory,
            out,
            mode,
        } => cli::build::build_theme(directory, out.as_deref(), &config, mode.resolve()).map(|_| ()),
        Commands::Compile { file, mode } => cli::compile::compile_file(file, &config, mode.resolve()),
        Commands::Init { directory } => cli::init::init_project(directory),
        Commands::Config => cli::config::print_config(&config),
    }
}
