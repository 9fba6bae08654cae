//! Parser: groups tokens into a single-level tree.
//!
//! The dialect has no nested semantics, so every token becomes one child of
//! the root in source order. A richer tree can be introduced here later
//! without touching the tokenizer or the per-node lowering.

use super::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: TokenKind,
    pub payload: String,
    pub line: usize,
    pub indent: String,
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Self {
            kind: token.kind,
            payload: token.payload,
            line: token.line,
            indent: token.indent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub children: Vec<Node>,
}

/// Build the tree. Never fails.
pub fn parse(tokens: Vec<Token>) -> Root {
    Root {
        children: tokens.into_iter().map(Node::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::tokenize;

    #[test]
    fn test_parse_is_one_child_per_token() {
        let tokens = tokenize("a\n{% if x %}\n{{ Hero }}").tokens;
        let root = parse(tokens.clone());

        assert_eq!(root.children.len(), tokens.len());
        for (node, token) in root.children.iter().zip(&tokens) {
            assert_eq!(node.kind, token.kind);
            assert_eq!(node.payload, token.payload);
            assert_eq!(node.line, token.line);
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse(Vec::new()).children.is_empty());
    }
}
