//! mpsc チャネルを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 宛先セッションの有界送信キューへ 1 行を積む
//! - キューが満杯のまま `send_timeout` を超えた場合は、その宛先への配送を諦める
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層（`src/ui/handler/connection.rs`）の writer タスクが行います。
//! 遅いクライアントが詰まらせるのは自分のキューだけで、送信側の待ちは最大 `send_timeout` です。

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::error::SendTimeoutError;

use crate::domain::{MessagePushError, MessagePusher, SessionHandle};

/// 有界 mpsc キューを使った MessagePusher 実装
#[derive(Debug, Clone)]
pub struct ChannelMessagePusher {
    send_timeout: Duration,
}

impl ChannelMessagePusher {
    pub fn new(send_timeout: Duration) -> Self {
        Self { send_timeout }
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn push_to(
        &self,
        recipient: &SessionHandle,
        line: &str,
    ) -> Result<(), MessagePushError> {
        match recipient
            .outbound
            .send_timeout(line.to_string(), self.send_timeout)
            .await
        {
            Ok(()) => {
                tracing::debug!("Pushed message to session '{}'", recipient.id);
                Ok(())
            }
            Err(SendTimeoutError::Timeout(_)) => {
                Err(MessagePushError::Timeout(self.send_timeout))
            }
            Err(SendTimeoutError::Closed(_)) => Err(MessagePushError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Nickname, Rgb, SessionId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 送信キューへの配送
    // - 満杯のキューに対するタイムアウト
    // - 閉じたキューに対するエラー
    // ========================================

    fn create_handle(capacity: usize) -> (SessionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = SessionHandle {
            id: SessionId::new(),
            nickname: Nickname::new("alice").unwrap(),
            color: Rgb::BLUE,
            outbound: tx,
        };
        (handle, rx)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 宛先の送信キューに行が積まれる
        // given (前提条件):
        let pusher = ChannelMessagePusher::new(Duration::from_millis(100));
        let (handle, mut rx) = create_handle(4);

        // when (操作):
        let result = pusher.push_to(&handle, "alice|255|hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("alice|255|hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_preserves_order() {
        // テスト項目: 同じ宛先への行は積んだ順に届く
        // given (前提条件):
        let pusher = ChannelMessagePusher::new(Duration::from_millis(100));
        let (handle, mut rx) = create_handle(4);

        // when (操作):
        pusher.push_to(&handle, "first").await.unwrap();
        pusher.push_to(&handle, "second").await.unwrap();

        // then (期待する結果):
        assert_eq!(rx.recv().await, Some("first".to_string()));
        assert_eq!(rx.recv().await, Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_full_queue_times_out() {
        // テスト項目: キューが満杯のままなら送信タイムアウトになる
        // given (前提条件):
        let timeout = Duration::from_millis(20);
        let pusher = ChannelMessagePusher::new(timeout);
        let (handle, _rx) = create_handle(1);
        pusher.push_to(&handle, "fills the queue").await.unwrap();

        // when (操作):
        let result = pusher.push_to(&handle, "stalls").await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::Timeout(timeout)));
    }

    #[tokio::test]
    async fn test_push_to_closed_queue() {
        // テスト項目: writer が終了した宛先への送信は Closed になる
        // given (前提条件):
        let pusher = ChannelMessagePusher::new(Duration::from_millis(100));
        let (handle, rx) = create_handle(1);
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&handle, "hello").await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::Closed));
    }
}
