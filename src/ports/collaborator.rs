//! Errors shared by the remote collaborator ports.

use thiserror::Error;

/// Failure talking to an optional remote collaborator (classification or
/// explanation service).
///
/// Callers never propagate this to the request boundary: a classifier
/// failure degrades to "please reformulate", an explainer failure to an
/// omitted summary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The call did not finish within the configured budget.
    #[error("collaborator timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("collaborator returned HTTP {status}")]
    Status { status: u16 },

    /// The answer could not be understood.
    #[error("unparseable collaborator response: {0}")]
    Parse(String),

    /// Not configured or deliberately switched off.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Whether retrying later could help.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CollaboratorError::Timeout { .. }
                | CollaboratorError::Network(_)
                | CollaboratorError::Status { status: 429 | 500..=599 }
        )
    }
}
