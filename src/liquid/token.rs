//! Lexical items of the extended dialect.

/// Classification of one source line (or one props block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Anything that is not a recognized delimiter line.
    Text,
    /// A `{% ... %}` line the extended dialect does not own.
    StockTag,
    /// A line opening with `{{` that does not also close on the same line.
    StockVariable,
    /// `{% import Name from "path" %}`.
    Import,
    /// `{{ Name | attr:value ... }}`.
    Render,
    /// `{% props name %} ... {% endprops %}`, spanning several lines.
    PropsBlock,
}

/// A classified source region.
///
/// Delimited kinds keep their delimiters in `payload` and carry the leading
/// whitespace of their line in `indent`. `Text` keeps the raw line, including
/// a `\r` terminator if the source used CRLF, and has an empty `indent`.
///
/// A `PropsBlock` payload is the block name, a `\n`, then the inner lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: String,
    /// 1-based line the token starts on.
    pub line: usize,
    pub indent: String,
}

impl Token {
    pub fn new(kind: TokenKind, payload: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            payload: payload.into(),
            line,
            indent: String::new(),
        }
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Build a props block token from its name and accumulated body.
    pub fn props_block(name: &str, body: &str, line: usize) -> Self {
        Self::new(TokenKind::PropsBlock, format!("{name}\n{body}"), line)
    }
}
