//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Compile component-island Liquid themes and sync them to a Shopify store
#[derive(Parser, Debug, Clone)]
#[command(name = "framework", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: framework.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Store domain, e.g. my-shop.myshopify.com
    #[arg(long, global = true, value_hint = clap::ValueHint::Url)]
    pub store_url: Option<String>,

    /// Theme to sync with
    #[arg(long, global = true)]
    pub theme_id: Option<String>,

    /// Admin API access token
    #[arg(long, global = true)]
    pub access_token: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch theme/ and upload every change to the store
    #[command(visible_alias = "w")]
    Watch {
        /// Project directory containing theme/
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,

        #[command(flatten)]
        mode: ModeArgs,
    },

    /// Compile every file under theme/ into an output directory
    #[command(visible_alias = "b")]
    Build {
        /// Project directory containing theme/
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,

        /// Output directory (default: <directory>/dist)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        out: Option<PathBuf>,

        #[command(flatten)]
        mode: ModeArgs,
    },

    /// Compile a single template and print the result
    #[command(visible_alias = "c")]
    Compile {
        /// Template to compile
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        mode: ModeArgs,
    },

    /// Create theme/ and a starter framework.toml
    #[command(visible_alias = "i")]
    Init {
        /// Project directory (created if missing)
        #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

/// Asset URL mode overrides shared by compiling commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ModeArgs {
    /// Point component assets at the dev server
    #[arg(short, long, conflicts_with = "production")]
    pub development: bool,

    /// Use the theme's asset_url filter for component assets
    #[arg(short, long)]
    pub production: bool,
}

impl ModeArgs {
    /// `Some(true)` for development, `Some(false)` for production, `None`
    /// when neither flag was given.
    pub const fn resolve(&self) -> Option<bool> {
        match (self.development, self.production) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Cli {
    /// Commands that talk to the store and need credentials.
    pub const fn requires_remote(&self) -> bool {
        matches!(self.command, Commands::Watch { .. })
    }
}
