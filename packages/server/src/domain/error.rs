//! Domain errors.

use std::time::Duration;

use thiserror::Error;

use super::SessionState;

/// Failure delivering one line to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The recipient's writer is gone (connection closed)
    #[error("recipient outbound channel is closed")]
    Closed,

    /// The recipient's outbound queue stayed full for the whole timeout
    #[error("recipient did not accept the message within {0:?}")]
    Timeout(Duration),
}

/// Invalid transition of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session cannot move from {from:?} to {to:?}")]
pub struct SessionStateError {
    pub from: SessionState,
    pub to: SessionState,
}
