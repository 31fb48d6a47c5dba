//! Error types for the chat client.

use thiserror::Error;
use tsudoi_shared::protocol::ProtocolError;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Invalid handshake input (e.g. blank nickname)
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
