//! `framework build`: compile theme/ into an output directory.
//!
//! Templates go through the pipeline, every other file is copied verbatim.
//! Templates with error diagnostics are left out of the output and listed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;

use super::watch::theme_root;
use crate::config::FrameworkConfig;
use crate::liquid::{self, CompileOptions};
use crate::logger::status_error;
use crate::log;

/// Default output directory name, relative to the project directory.
pub const DEFAULT_OUT_DIR: &str = "dist";

#[derive(Debug, Default)]
pub struct BuildReport {
    pub compiled: usize,
    pub copied: usize,
    /// Templates left out, with their error diagnostics
    pub skipped: Vec<(PathBuf, String)>,
}

enum Outcome {
    Compiled,
    Copied,
    Skipped(PathBuf, String),
}

/// Build `<directory>/theme` into `out` (default `<directory>/dist`).
pub fn build_theme(
    directory: &Path,
    out: Option<&Path>,
    config: &FrameworkConfig,
    development: Option<bool>,
) -> Result<BuildReport> {
    let root = theme_root(directory)?;
    let out = out.map_or_else(|| directory.join(DEFAULT_OUT_DIR), Path::to_path_buf);
    let options = config.compile_options(development, false);

    let report = build_dir(&root, &out, &options)?;

    for (path, detail) in &report.skipped {
        status_error(&format!("skipped {}", path.display()), detail);
    }
    log!(
        "build";
        "{} compiled, {} copied, {} skipped -> {}",
        report.compiled,
        report.copied,
        report.skipped.len(),
        out.display()
    );
    Ok(report)
}

/// Compile or copy every file under `root` into `out`, preserving layout.
pub fn build_dir(root: &Path, out: &Path, options: &CompileOptions) -> Result<BuildReport> {
    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory `{}`", out.display()))?;

    let files = collect_files(root, out);
    crate::debug!("build"; "{} file(s) under {}", files.len(), root.display());

    let outcomes = files
        .par_iter()
        .map(|path| build_file(root, out, path, options))
        .collect::<Result<Vec<_>>>()?;

    let mut report = BuildReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Compiled => report.compiled += 1,
            Outcome::Copied => report.copied += 1,
            Outcome::Skipped(path, detail) => report.skipped.push((path, detail)),
        }
    }
    report.skipped.sort();
    Ok(report)
}

/// Regular files under `root`, skipping hidden entries and `out` itself.
fn collect_files(root: &Path, out: &Path) -> Vec<PathBuf> {
    let out = out.canonicalize().ok();
    WalkDir::new(root)
        .skip_hidden(true)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path())
        .filter(|path| out.as_ref().is_none_or(|out| !path.starts_with(out)))
        .collect()
}

fn build_file(root: &Path, out: &Path, path: &Path, options: &CompileOptions) -> Result<Outcome> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("`{}` is outside `{}`", path.display(), root.display()))?;
    let target = out.join(relative);

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }

    if !liquid::is_template(path) {
        fs::copy(path, &target)
            .with_context(|| format!("failed to copy `{}`", path.display()))?;
        return Ok(Outcome::Copied);
    }

    let bytes = fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
    let Ok(source) = String::from_utf8(bytes) else {
        return Ok(Outcome::Skipped(
            relative.to_path_buf(),
            "not valid UTF-8".to_string(),
        ));
    };
    let compiled = liquid::compile_source(&source, options);

    if compiled.has_errors() {
        let detail = compiled
            .errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(Outcome::Skipped(relative.to_path_buf(), detail));
    }
    for warning in compiled.warnings() {
        log!("warning"; "{}: {}", relative.display(), warning);
    }

    fs::write(&target, compiled.output)
        .with_context(|| format!("failed to write `{}`", target.display()))?;
    Ok(Outcome::Compiled)
}
