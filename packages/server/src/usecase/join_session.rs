//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - Registry への登録と入室通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加したセッション自身を含む全員に入室通知が届く
//! - 既存参加者がいる場合：登録順が保たれる

use std::sync::Arc;

use crate::domain::{ChatMessage, SessionHandle, SessionRegistry};

use super::{BroadcastReport, BroadcastUseCase};

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    /// Registry（Active なセッションの集合）
    registry: Arc<dyn SessionRegistry>,
    /// ブロードキャスト
    broadcast: Arc<BroadcastUseCase>,
}

impl JoinSessionUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, broadcast: Arc<BroadcastUseCase>) -> Self {
        Self {
            registry,
            broadcast,
        }
    }

    /// セッションを Registry に登録し、`<nickname> joined the chat!` を全員へ送る
    pub async fn execute(&self, session: SessionHandle) -> BroadcastReport {
        let notice = ChatMessage::joined(&session.nickname);
        let session_id = session.id;
        let nickname = session.nickname.clone();

        self.registry.join(session).await;
        tracing::info!(
            "Session '{}' joined as '{}'. Total sessions: {}",
            session_id,
            nickname,
            self.registry.len().await
        );

        self.broadcast.execute(&notice).await
    }
}
