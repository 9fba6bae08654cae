//! Line-oriented tokenizer.
//!
//! Each line is classified on its own, except inside a props block where
//! lines are collected until `{% endprops %}`. Rules, first match wins:
//!
//! | Trimmed line                       | Kind            |
//! |------------------------------------|-----------------|
//! | inside a props block               | (accumulated)   |
//! | `{% props <name> %}`               | opens a block   |
//! | `{% import ... %}`                 | `Import`        |
//! | `{{ ... }}`                        | `Render`        |
//! | `{% ...`                           | `StockTag`      |
//! | `{{ ...`                           | `StockVariable` |
//! | anything else                      | `Text`          |

use super::diagnostic::Diagnostic;
use super::token::{Token, TokenKind};

const TAG_OPEN: &str = "{%";
const TAG_CLOSE: &str = "%}";
const OBJECT_OPEN: &str = "{{";
const OBJECT_CLOSE: &str = "}}";
const PROPS_OPEN: &str = "{% props ";
const PROPS_CLOSE: &str = "{% endprops %}";
const IMPORT_OPEN: &str = "{% import";

/// Tokenizer output. Tokenization never fails; problems are reported here.
#[derive(Debug, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split `source` into classified tokens.
pub fn tokenize(source: &str) -> Tokenized {
    let mut tokenizer = Tokenizer::default();
    for (index, raw) in split_lines(source).enumerate() {
        tokenizer.feed(index + 1, raw);
    }
    tokenizer.finish()
}

/// Split on `\n`. A terminating newline does not open an extra empty line.
fn split_lines(source: &str) -> impl Iterator<Item = &str> {
    let body = source.strip_suffix('\n').unwrap_or(source);
    (!source.is_empty())
        .then(|| body.split('\n'))
        .into_iter()
        .flatten()
}

/// A props block waiting for its `{% endprops %}`.
struct OpenProps {
    name: String,
    line: usize,
    /// Raw lines (opening tag included) for recovery at end of input.
    raw_lines: Vec<String>,
    body: String,
}

#[derive(Default)]
struct Tokenizer {
    out: Tokenized,
    props: Option<OpenProps>,
}

impl Tokenizer {
    fn feed(&mut self, line_no: usize, raw: &str) {
        // CRLF is classified as LF; `Text` keeps the original terminator.
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim();

        if trimmed == PROPS_CLOSE
            && let Some(props) = self.props.take()
        {
            self.push(Token::props_block(&props.name, &props.body, props.line));
            return;
        }

        if let Some(props) = self.props.as_mut() {
            props.body.push_str(line);
            props.body.push('\n');
            props.raw_lines.push(raw.to_string());
            return;
        }

        if let Some(name) = props_name(trimmed) {
            self.props = Some(OpenProps {
                name: name.to_string(),
                line: line_no,
                raw_lines: vec![raw.to_string()],
                body: String::new(),
            });
            return;
        }

        let kind = classify(trimmed);
        let token = match kind {
            TokenKind::Text => Token::new(kind, raw, line_no),
            _ => Token::new(kind, trimmed, line_no).with_indent(leading_whitespace(line)),
        };
        self.push(token);
    }

    fn push(&mut self, token: Token) {
        self.out.tokens.push(token);
    }

    fn finish(mut self) -> Tokenized {
        if let Some(props) = self.props.take() {
            self.out.diagnostics.push(Diagnostic::error(
                props.line,
                format!(
                    "unterminated props block `{}`: missing `{PROPS_CLOSE}`",
                    props.name
                ),
            ));
            for (offset, raw) in props.raw_lines.into_iter().enumerate() {
                self.push(Token::new(TokenKind::Text, raw, props.line + offset));
            }
        }
        self.out
    }
}

/// Name of a props block opened by `trimmed`, if it opens one.
fn props_name(trimmed: &str) -> Option<&str> {
    if !trimmed.ends_with(TAG_CLOSE) {
        return None;
    }
    let rest = trimmed.strip_prefix(PROPS_OPEN)?;
    Some(rest.strip_suffix(TAG_CLOSE).unwrap_or(rest).trim())
}

/// Classify a trimmed line outside of a props block.
fn classify(trimmed: &str) -> TokenKind {
    if trimmed.starts_with(IMPORT_OPEN) && trimmed.ends_with(TAG_CLOSE) {
        TokenKind::Import
    } else if trimmed.starts_with(OBJECT_OPEN) && trimmed.ends_with(OBJECT_CLOSE) {
        TokenKind::Render
    } else if trimmed.starts_with(TAG_OPEN) {
        TokenKind::StockTag
    } else if trimmed.starts_with(OBJECT_OPEN) {
        TokenKind::StockVariable
    } else {
        TokenKind::Text
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
