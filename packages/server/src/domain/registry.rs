//! Session Registry trait 定義
//!
//! ブロードキャスト対象となる Active なセッションの集合へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{SessionHandle, SessionId};

/// Session Registry trait
///
/// 接続順（登録順）を保持するセッション集合。
/// 各操作は単一のロック区間で完結し、呼び出し側がロックを保持し続けることはない。
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// セッションを末尾に追加（同じ ID は一度だけ登録される）
    async fn join(&self, session: SessionHandle);

    /// ID でセッションを削除。削除した場合は `true`、既に存在しない場合は `false`
    async fn leave(&self, session_id: &SessionId) -> bool;

    /// 現時点のセッション一覧のコピーを登録順で取得
    async fn snapshot(&self) -> Vec<SessionHandle>;

    /// 登録中のセッション数
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
