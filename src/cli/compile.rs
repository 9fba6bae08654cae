//! `framework compile`: print one compiled template to stdout.

use std::fs;
use std::io::{Write, stdout};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::FrameworkConfig;
use crate::liquid::{self, Compiled};
use crate::log;

/// Compile `file` and write the output to stdout.
///
/// Diagnostics go to stderr. Output is printed even when there are errors,
/// but the command then fails.
pub fn compile_file(file: &Path, config: &FrameworkConfig, development: Option<bool>) -> Result<()> {
    let compiled = compile_path(file, config, development)?;

    let mut stdout = stdout().lock();
    stdout.write_all(compiled.output.as_bytes())?;
    stdout.flush()?;

    if compiled.has_errors() {
        bail!("`{}` has errors", file.display());
    }
    Ok(())
}

fn compile_path(file: &Path, config: &FrameworkConfig, development: Option<bool>) -> Result<Compiled> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;

    let compiled = liquid::compile_source(&source, &config.compile_options(development, false));
    for diagnostic in &compiled.diagnostics {
        let module = if diagnostic.is_error() { "error" } else { "warning" };
        log!(module; "{}: {}", file.display(), diagnostic);
    }
    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_path_production() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("hero.liquid");
        fs::write(
            &file,
            "{% import Hero from \"./Hero.jsx\" %}\n<h1>{{ title }}</h1>\n{{ Hero }}\n",
        )
        .unwrap();

        let compiled = compile_path(&file, &FrameworkConfig::default(), None).unwrap();
        assert!(compiled.diagnostics.is_empty());
        assert!(compiled.output.starts_with("\n<h1>{{ title }}</h1>\n"));
        assert!(compiled.output.contains("{{ './Hero.jsx' | asset_url }}"));
    }

    #[test]
    fn test_compile_path_uses_config_mode() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("hero.liquid");
        fs::write(&file, "{% import Hero from \"Hero.jsx\" %}\n{{ Hero }}\n").unwrap();

        let config = FrameworkConfig {
            development: Some(true),
            vite_server_url: Some("http://localhost:5173/".into()),
            ..Default::default()
        };
        let compiled = compile_path(&file, &config, None).unwrap();
        assert!(compiled.output.contains("asset=\"http://localhost:5173/Hero.jsx\""));

        let compiled = compile_path(&file, &config, Some(false)).unwrap();
        assert!(compiled.output.contains("{{ 'Hero.jsx' | asset_url }}"));
    }

    #[test]
    fn test_compile_missing_file() {
        let err = compile_file(Path::new("/no/such/file.liquid"), &FrameworkConfig::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
