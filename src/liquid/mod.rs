//! Extended Liquid pipeline.
//!
//! Lowers the extended dialect (component imports, props blocks and
//! component render directives) into stock Liquid that the platform renders
//! as-is:
//!
//! ```text
//! source ──tokenize──▶ Vec<Token> ──parse──▶ Root ──compile──▶ stock Liquid
//! ```
//!
//! Every stage is a pure function of its input. Nothing is cached between
//! files, so any number of compilations may run in parallel.
//!
//! # Limitations
//!
//! Tokenization is line-oriented: import and render directives must sit on
//! a single line, and `{% props %}` / `{% endprops %}` must each be on their
//! own line.

mod compiler;
mod diagnostic;
mod parser;
mod token;
mod tokenizer;

pub use compiler::{CompileOptions, Compiled, compile};
pub use diagnostic::Diagnostic;
pub use parser::parse;
pub use tokenizer::{Tokenized, tokenize};

use std::path::Path;

/// File extension of templates that go through the pipeline.
pub const TEMPLATE_EXTENSION: &str = "liquid";

/// Whether `path` is a template that must be compiled before upload.
pub fn is_template(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == TEMPLATE_EXTENSION)
}

/// Run the whole pipeline over `source`.
///
/// Tokenizer diagnostics come first, followed by those raised while lowering.
pub fn compile_source(source: &str, options: &CompileOptions) -> Compiled {
    let Tokenized {
        tokens,
        diagnostics: mut tokenizer_diagnostics,
    } = tokenize(source);

    let mut compiled = compile(&parse(tokens), options);
    tokenizer_diagnostics.append(&mut compiled.diagnostics);
    compiled.diagnostics = tokenizer_diagnostics;
    compiled
}
