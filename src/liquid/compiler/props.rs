//! Props block bodies.
//!
//! The body is embedded in a single-quoted HTML attribute, so quotes,
//! backslashes and control characters are backslash-escaped. Lines holding
//! `{{` or `}}` are left alone so stock Liquid still interpolates them.

use std::borrow::Cow;

/// Split a props payload into its name and body.
pub(super) fn split(payload: &str) -> (&str, &str) {
    let (name, body) = payload.split_once('\n').unwrap_or((payload, ""));
    (name.trim(), body)
}

/// Escape a props body for attribute embedding, line by line.
pub(super) fn escape_body(body: &str) -> String {
    body.trim_end_matches('\n')
        .split('\n')
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line(line: &str) -> Cow<'_, str> {
    if line.contains("{{") || line.contains("}}") {
        return Cow::Borrowed(line);
    }

    let mut escaped = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
