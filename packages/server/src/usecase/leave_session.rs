//! UseCase: セッション退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveSessionUseCase::execute() メソッド
//! - Registry からの削除と退出通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 退出したセッションに以降のメッセージが届かないこと
//! - 退出通知が残りの参加者にちょうど 1 回だけ届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：退出と通知
//! - エッジケース：最後の参加者の退出（通知対象なし）
//! - 異常系：既に退出済みのセッションの二重退出

use std::sync::Arc;

use crate::domain::{ChatMessage, SessionHandle, SessionRegistry};

use super::{BroadcastReport, BroadcastUseCase};

/// セッション退出のユースケース
pub struct LeaveSessionUseCase {
    /// Registry（Active なセッションの集合）
    registry: Arc<dyn SessionRegistry>,
    /// ブロードキャスト
    broadcast: Arc<BroadcastUseCase>,
}

impl LeaveSessionUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, broadcast: Arc<BroadcastUseCase>) -> Self {
        Self {
            registry,
            broadcast,
        }
    }

    /// セッションを Registry から削除し、`<nickname> left the chat.` を残りの全員へ送る
    ///
    /// # Returns
    ///
    /// * `Some(BroadcastReport)` - 削除して通知した場合
    /// * `None` - 既に Registry に存在しなかった場合（通知もしない）
    pub async fn execute(&self, session: &SessionHandle) -> Option<BroadcastReport> {
        if !self.registry.leave(&session.id).await {
            tracing::debug!("Session '{}' already left, skipping notice", session.id);
            return None;
        }

        tracing::info!(
            "Session '{}' ({}) disconnected. Total sessions: {}",
            session.id,
            session.nickname,
            self.count_remaining_sessions().await
        );

        Some(
            self.broadcast
                .execute(&ChatMessage::left(&session.nickname))
                .await,
        )
    }

    /// 残りのセッション数を取得
    pub async fn count_remaining_sessions(&self) -> usize {
        self.registry.len().await
    }
}
