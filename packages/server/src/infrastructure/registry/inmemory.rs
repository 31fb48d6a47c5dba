//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! 登録順を保つため `Vec` をインメモリストアとして使用します。
//!
//! ロックは join / leave / snapshot の各呼び出しの内側でのみ保持され、
//! ブロードキャスト中の送信待ちがセッションの参加・退出を止めることはありません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SessionHandle, SessionId, SessionRegistry};

/// インメモリ Session Registry 実装
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    /// Active なセッション（接続順）
    sessions: Mutex<Vec<SessionHandle>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn join(&self, session: SessionHandle) {
        let mut sessions = self.sessions.lock().await;
        if sessions.iter().any(|s| s.id == session.id) {
            tracing::warn!("Session '{}' is already registered, ignoring", session.id);
            return;
        }
        tracing::debug!(
            "Session '{}' ({}) joined the registry",
            session.id,
            session.nickname
        );
        sessions.push(session);
    }

    async fn leave(&self, session_id: &SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.iter().position(|s| &s.id == session_id) {
            Some(index) => {
                sessions.remove(index);
                tracing::debug!(
                    "Session '{}' left the registry. Total sessions: {}",
                    session_id,
                    sessions.len()
                );
                true
            }
            None => false,
        }
    }

    async fn snapshot(&self) -> Vec<SessionHandle> {
        self.sessions.lock().await.clone()
    }

    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Nickname, Rgb};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - join / leave / snapshot / len の基本動作
    // - 登録順が保たれること
    // - 同一セッションの二重登録・二重削除が無害であること
    //
    // 【なぜこのテストが必要か】
    // - Registry はブロードキャスト対象を決める唯一の共有状態
    // - 切断済みセッションに配送されないことを保証する必要がある
    // ========================================

    fn create_handle(nickname: &str) -> SessionHandle {
        let (tx, _rx) = mpsc::channel(1);
        SessionHandle {
            id: SessionId::new(),
            nickname: Nickname::new(nickname).unwrap(),
            color: Rgb::DEFAULT,
            outbound: tx,
        }
    }

    fn nicknames(sessions: &[SessionHandle]) -> Vec<String> {
        sessions
            .iter()
            .map(|s| s.nickname.as_str().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_join_keeps_connect_order() {
        // テスト項目: snapshot は接続順でセッションを返す
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();

        // when (操作):
        registry.join(create_handle("charlie")).await;
        registry.join(create_handle("alice")).await;
        registry.join(create_handle("bob")).await;

        // then (期待する結果):
        let snapshot = registry.snapshot().await;
        assert_eq!(nicknames(&snapshot), vec!["charlie", "alice", "bob"]);
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn test_join_same_session_twice_is_ignored() {
        // テスト項目: 同じセッションは一度しか登録されない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let alice = create_handle("alice");

        // when (操作):
        registry.join(alice.clone()).await;
        registry.join(alice).await;

        // then (期待する結果):
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_leave_removes_by_identity() {
        // テスト項目: 同名でも ID が異なるセッションは削除されない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let first = create_handle("alice");
        let second = create_handle("alice");
        registry.join(first.clone()).await;
        registry.join(second.clone()).await;

        // when (操作):
        let removed = registry.leave(&first.id).await;

        // then (期待する結果):
        assert!(removed);
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, second.id);
    }

    #[tokio::test]
    async fn test_leave_twice_is_noop() {
        // テスト項目: 二重削除しても件数は一度しか減らない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let alice = create_handle("alice");
        let bob = create_handle("bob");
        registry.join(alice.clone()).await;
        registry.join(bob).await;

        // when (操作):
        let first = registry.leave(&alice.id).await;
        let second = registry.leave(&alice.id).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_point_in_time() {
        // テスト項目: 取得済みの snapshot はその後の変更に影響されない
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();
        let alice = create_handle("alice");
        registry.join(alice.clone()).await;
        let snapshot = registry.snapshot().await;

        // when (操作):
        registry.leave(&alice.id).await;
        registry.join(create_handle("bob")).await;

        // then (期待する結果):
        assert_eq!(nicknames(&snapshot), vec!["alice"]);
        assert_eq!(nicknames(&registry.snapshot().await), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_empty_registry() {
        // テスト項目: 空の Registry は空の snapshot を返す
        // given (前提条件):
        let registry = InMemorySessionRegistry::new();

        // when (操作):
        let snapshot = registry.snapshot().await;

        // then (期待する結果):
        assert!(snapshot.is_empty());
        assert!(registry.is_empty().await);
    }
}
