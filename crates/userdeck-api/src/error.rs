use thiserror::Error;

/// Top-level error type for the `userdeck-api` crate.
///
/// Covers every failure mode of a backend call: transport, URL
/// construction, non-success HTTP statuses, and payload decoding.
/// The console maps these into user-facing notifications via [`ErrorKind`].
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered with a non-success status other than 404.
    #[error("Backend rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The requested entity does not exist (HTTP 404).
    #[error("Entity not found")]
    NotFound,

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Coarse failure classification surfaced to the notification layer.
///
/// The console never inspects response bodies to distinguish failures;
/// this is the entire taxonomy it reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never completed (connect, DNS, timeout).
    Network,
    /// The backend was reachable but refused or mangled the request.
    Rejected,
    /// The entity does not exist; rendered as a terminal not-found view.
    NotFound,
}

impl Error {
    /// Classify this error for the notification layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Transport(e) if e.status() == Some(reqwest::StatusCode::NOT_FOUND) => {
                ErrorKind::NotFound
            }
            Self::Transport(_) => ErrorKind::Network,
            Self::InvalidUrl(_) | Self::Rejected { .. } | Self::Deserialization { .. } => {
                ErrorKind::Rejected
            }
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
