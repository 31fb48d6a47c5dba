//! Value objects identifying a session.

use std::fmt;

use tsudoi_shared::protocol::ProtocolError;
use uuid::Uuid;

/// Identity of one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const PLACEHOLDER_DISPLAY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NicknameKind {
    Placeholder,
    Named(String),
}

/// Nickname of a session.
///
/// A session holds the placeholder until its handshake succeeds. The
/// placeholder displays as `unknown` but never equals a chosen nickname,
/// including one spelled `unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(NicknameKind);

impl Nickname {
    /// Create a chosen nickname. Blank values are rejected.
    pub fn new(value: impl Into<String>) -> Result<Self, ProtocolError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ProtocolError::EmptyNickname);
        }
        Ok(Self(NicknameKind::Named(value)))
    }

    pub fn placeholder() -> Self {
        Self(NicknameKind::Placeholder)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.0, NicknameKind::Placeholder)
    }

    pub fn as_str(&self) -> &str {
        match &self.0 {
            NicknameKind::Placeholder => PLACEHOLDER_DISPLAY,
            NicknameKind::Named(value) => value,
        }
    }
}

impl TryFrom<String> for Nickname {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        // テスト項目: セッション ID は接続ごとに異なる
        // given (前提条件):
        // when (操作):
        let a = SessionId::new();
        let b = SessionId::new();

        // then (期待する結果):
        assert_ne!(a, b);
    }

    #[test]
    fn test_nickname_new_success() {
        // テスト項目: 空でないニックネームはそのまま保持される
        // given (前提条件):
        let value = " alice ";

        // when (操作):
        let nickname = Nickname::new(value).unwrap();

        // then (期待する結果):
        assert_eq!(nickname.as_str(), " alice ");
        assert!(!nickname.is_placeholder());
    }

    #[test]
    fn test_nickname_new_rejects_blank() {
        // テスト項目: 空・空白のみのニックネームは作成できない
        // given (前提条件):
        // when (操作):
        // then (期待する結果):
        assert_eq!(Nickname::new(""), Err(ProtocolError::EmptyNickname));
        assert_eq!(Nickname::new("  \t"), Err(ProtocolError::EmptyNickname));
        assert!(Nickname::try_from(String::new()).is_err());
    }

    #[test]
    fn test_placeholder_is_never_a_real_nickname() {
        // テスト項目: プレースホルダーは "unknown" という実名とも区別される
        // given (前提条件):
        let placeholder = Nickname::placeholder();
        let named_unknown = Nickname::new("unknown").unwrap();

        // when (操作):
        // then (期待する結果):
        assert_eq!(placeholder.to_string(), "unknown");
        assert_ne!(placeholder, named_unknown);
        assert!(placeholder.is_placeholder());
        assert!(!named_unknown.is_placeholder());
    }
}
