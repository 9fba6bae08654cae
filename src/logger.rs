//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only shown with `--verbose`
//! - status lines for remote sync results (`✓ uploaded ...`, `✗ ...`)
//!
//! Everything goes to stderr so that `compile` can write its output to stdout.
//!
//! # Example
//!
//! ```ignore
//! log!("watch"; "watching {}", root.display());
//! status_success("uploaded sections/hero.liquid");
//! status_error("failed to upload sections/hero.liquid", "HTTP 401");
//! ```

use owo_colors::{OwoColorize, Stream};
use std::io::{Write, stderr};
use std::sync::atomic::{AtomicBool, Ordering};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
///
/// Plain text when stderr is not a terminal or `--color never` is set.
#[inline]
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "watch" => paint(&prefix, |s| s.bright_green().bold().to_string()),
        "sync" => paint(&prefix, |s| s.bright_blue().bold().to_string()),
        "build" => paint(&prefix, |s| s.bright_cyan().bold().to_string()),
        "error" => paint(&prefix, |s| s.bright_red().bold().to_string()),
        _ => paint(&prefix, |s| s.bright_yellow().bold().to_string()),
    }
}

fn paint(text: &str, style: impl Fn(&&str) -> String) -> String {
    text.if_supports_color(Stream::Stderr, style).to_string()
}

// ============================================================================
// Status lines
// ============================================================================

/// Successful remote operation (✓ prefix, green).
pub fn status_success(message: &str) {
    status_line(&paint("✓", |s| s.green().to_string()), message);
}

/// Failed operation (✗ prefix, red) with optional indented detail.
pub fn status_error(summary: &str, detail: &str) {
    status_line(
        &paint("✗", |s| s.red().to_string()),
        &format_failure(summary, detail),
    );
}

/// Skipped or suspicious input (⚠ prefix, yellow).
pub fn status_warning(message: &str) {
    status_line(&paint("⚠", |s| s.yellow().to_string()), message);
}

fn status_line(symbol: &str, message: &str) {
    let mut stderr = stderr().lock();
    writeln!(stderr, "{symbol} {message}").ok();
    stderr.flush().ok();
}

/// Join a summary and its detail, indenting every detail line.
fn format_failure(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        return summary.to_string();
    }
    let mut message = summary.to_string();
    for line in detail.lines() {
        message.push_str("\n  ");
        message.push_str(line);
    }
    message
}

// ============================================================================
// Tests
// ============================================================================
