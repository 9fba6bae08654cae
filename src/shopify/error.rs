//! Remote operation errors.

use thiserror::Error;

/// A failed remote operation. Carries enough to show the user what the
/// platform said.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors (HTTP {status}): {body}")]
    GraphQl { status: u16, body: String },

    #[error("{operation} rejected: {messages}")]
    UserErrors {
        operation: &'static str,
        messages: String,
    },

    #[error("unreadable response (HTTP {status}): {body}")]
    Decode { status: u16, body: String },
}

impl RemoteError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Status { status, .. }
            | Self::GraphQl { status, .. }
            | Self::Decode { status, .. } => Some(*status),
            Self::UserErrors { .. } => Some(200),
        }
    }
}
