//! Command-line interface module.

mod args;
pub mod build;
pub mod compile;
pub mod config;
pub mod init;
pub mod watch;

pub use args::{Cli, Commands};
