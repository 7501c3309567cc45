use thiserror::Error;

/// Failure modes shared by the catalog and weather lookups.
///
/// Storage problems are deliberately absent: the history store treats an
/// unreadable file as an empty history instead of failing.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (DNS, connect, body read).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Status { status: u16 },

    /// The response body did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Parse(String),

    /// The operation was superseded or the view went away. Never shown to
    /// the user.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
