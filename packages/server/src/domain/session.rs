//! Per-connection session state.

use tokio::sync::mpsc;

use super::{Nickname, Rgb, SessionId, SessionStateError};

/// Queue feeding one session's socket writer.
pub type OutboundSender = mpsc::Sender<String>;

/// Lifecycle of a session.
///
/// `Connecting → Registering → Active → Closed`. A session may also close
/// straight from `Connecting` or `Registering` when the handshake fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Registering,
    Active,
    Closed,
}

/// What the registry keeps for an active session: its identity and the
/// queue its writer drains.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    pub nickname: Nickname,
    pub color: Rgb,
    pub outbound: OutboundSender,
}

/// Session owned by its connection handler.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    nickname: Nickname,
    color: Rgb,
    state: SessionState,
}

impl Session {
    /// Create a session in `Connecting` holding the placeholder nickname.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            nickname: Nickname::placeholder(),
            color: Rgb::DEFAULT,
            state: SessionState::Connecting,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn begin_registration(&mut self) -> Result<(), SessionStateError> {
        self.transition(SessionState::Connecting, SessionState::Registering)
    }

    /// Complete the handshake and produce the handle to register.
    pub fn activate(
        &mut self,
        nickname: Nickname,
        color: Rgb,
        outbound: OutboundSender,
    ) -> Result<SessionHandle, SessionStateError> {
        self.transition(SessionState::Registering, SessionState::Active)?;
        self.nickname = nickname;
        self.color = color;

        Ok(SessionHandle {
            id: self.id,
            nickname: self.nickname.clone(),
            color: self.color,
            outbound,
        })
    }

    /// Move to `Closed`. Returns `true` only when the session was `Active`,
    /// i.e. when a leave notice is owed. Closing twice is a no-op.
    pub fn close(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = SessionState::Closed;
        was_active
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
    ) -> Result<(), SessionStateError> {
        if self.state != from {
            return Err(SessionStateError {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
