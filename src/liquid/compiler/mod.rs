//! Lowering of the extended dialect to stock Liquid.
//!
//! Walks the root's children in order with two per-file tables:
//! component imports (`name -> path`) and props blocks (`name -> escaped
//! body`). Each child contributes its emitted text plus a newline.
//!
//! | Child            | Emits                                        |
//! |------------------|----------------------------------------------|
//! | `Import`         | nothing (or a comment if malformed)          |
//! | `PropsBlock`     | nothing                                      |
//! | `Render`         | a `<framework-island>` wrapper               |
//! | everything else  | the payload, verbatim                        |

mod asset;
mod element;
mod import;
mod props;
mod render;

use rustc_hash::FxHashMap;

use super::diagnostic::{Diagnostic, Severity};
use super::parser::{Node, Root};
use super::token::TokenKind;

/// Read-only view of the settings the compiler depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Serve component assets from the dev server instead of the theme.
    pub development: bool,
    /// Dev server base URL; `http://localhost:3000` when unset or empty.
    pub vite_server_url: Option<String>,
}

/// Result of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compiled {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Compiled {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Tables local to a single compilation.
#[derive(Debug, Default)]
struct Scope {
    imports: FxHashMap<String, String>,
    props: FxHashMap<String, String>,
}

/// Lower `root` to stock Liquid.
pub fn compile(root: &Root, options: &CompileOptions) -> Compiled {
    let mut scope = Scope::default();
    let mut compiled = Compiled {
        output: String::with_capacity(root.children.iter().map(|n| n.payload.len() + 1).sum()),
        diagnostics: Vec::new(),
    };

    for node in &root.children {
        lower_node(node, &mut scope, options, &mut compiled);
        compiled.output.push('\n');
    }

    compiled
}

fn lower_node(node: &Node, scope: &mut Scope, options: &CompileOptions, out: &mut Compiled) {
    match node.kind {
        TokenKind::Import => match import::parse(&node.payload) {
            Ok(import) => {
                // Later imports of the same name win.
                scope
                    .imports
                    .insert(import.name.to_string(), import.path.to_string());
            }
            Err(statement) => {
                out.output.push_str(&node.indent);
                out.output
                    .push_str(&format!("<!-- Invalid import statement: {statement} -->"));
                out.diagnostics.push(Diagnostic::warning(
                    node.line,
                    format!("invalid import statement `{}`", node.payload),
                ));
            }
        },
        TokenKind::PropsBlock => {
            let (name, body) = props::split(&node.payload);
            scope
                .props
                .insert(name.to_string(), props::escape_body(body));
        }
        TokenKind::Render => {
            let directive = render::RenderDirective::parse(&node.payload);
            match scope.imports.get(directive.component) {
                Some(path) => {
                    let island =
                        render::lower(&directive, path, &scope.props, options, &node.indent);
                    out.output.push_str(&island);
                }
                None => {
                    out.output.push_str(&node.indent);
                    out.output.push_str(&format!(
                        "<!-- Component not imported: {} -->",
                        directive.component
                    ));
                    out.diagnostics.push(Diagnostic::warning(
                        node.line,
                        format!("component `{}` is not imported", directive.component),
                    ));
                }
            }
        }
        TokenKind::StockTag | TokenKind::StockVariable | TokenKind::Text => {
            out.output.push_str(&node.indent);
            out.output.push_str(&node.payload);
        }
    }
}
