//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 受信した 1 行を送信者の名前と色でそのまま全員へ配送すること
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者自身を含む全員に届く
//! - エッジケース：空行・区切り文字を含む本文

use std::sync::Arc;

use crate::domain::{ChatMessage, SessionHandle};

use super::{BroadcastReport, BroadcastUseCase};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// ブロードキャスト
    broadcast: Arc<BroadcastUseCase>,
}

impl SendMessageUseCase {
    pub fn new(broadcast: Arc<BroadcastUseCase>) -> Self {
        Self { broadcast }
    }

    /// `sender` が送った 1 行を、エスケープや長さ制限なしで全員へ配送する
    pub async fn execute(&self, sender: &SessionHandle, text: String) -> BroadcastReport {
        tracing::debug!("Received line from '{}': {}", sender.nickname, text);
        let message = ChatMessage::from_session(&sender.nickname, sender.color, text);
        self.broadcast.execute(&message).await
    }
}
