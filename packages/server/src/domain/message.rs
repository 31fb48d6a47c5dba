//! Chat message passed to the broadcaster.

use tsudoi_shared::protocol::ChatLine;

use super::{Nickname, Rgb};

/// Sender name used for join and leave notices.
pub const SYSTEM_SENDER: &str = "Server";

/// Ephemeral (sender, color, text) triple. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub color: Rgb,
    pub text: String,
}

impl ChatMessage {
    /// A line typed by a session, relayed verbatim.
    pub fn from_session(nickname: &Nickname, color: Rgb, text: impl Into<String>) -> Self {
        Self {
            sender: nickname.as_str().to_string(),
            color,
            text: text.into(),
        }
    }

    pub fn joined(nickname: &Nickname) -> Self {
        Self::system(format!("{} joined the chat!", nickname))
    }

    pub fn left(nickname: &Nickname) -> Self {
        Self::system(format!("{} left the chat.", nickname))
    }

    fn system(text: String) -> Self {
        Self {
            sender: SYSTEM_SENDER.to_string(),
            color: Rgb::ALERT,
            text,
        }
    }

    /// Encode as one wire line (no trailing newline).
    pub fn to_wire(&self) -> String {
        ChatLine::new(self.sender.as_str(), self.color, self.text.as_str()).encode()
    }
}
