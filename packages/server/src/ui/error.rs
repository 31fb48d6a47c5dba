//! Server-level errors.

use thiserror::Error;

/// Errors that stop the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be acquired
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Unrecoverable listener I/O failure
    #[error("listener I/O error: {0}")]
    Io(#[from] std::io::Error),
}
