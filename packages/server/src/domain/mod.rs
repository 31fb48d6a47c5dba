//! Domain layer
//!
//! Value objects, the per-connection session state machine and the
//! interfaces (`SessionRegistry`, `MessagePusher`) the use cases depend on.
//! Implementations live in the infrastructure layer.

mod error;
mod message;
mod message_pusher;
mod registry;
mod session;
mod value_object;

pub use error::{MessagePushError, SessionStateError};
pub use message::{ChatMessage, SYSTEM_SENDER};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::MessagePusher;
pub use registry::SessionRegistry;
pub use session::{OutboundSender, Session, SessionHandle, SessionState};
pub use value_object::{Nickname, SessionId};

pub use tsudoi_shared::protocol::Rgb;
