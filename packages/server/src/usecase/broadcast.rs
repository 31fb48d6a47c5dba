//! UseCase: ブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastUseCase::execute() メソッド
//! - Registry の snapshot に含まれる全セッションへの配送
//!
//! ### なぜこのテストが必要か
//! - snapshot 時点の全員にちょうど 1 通ずつ届くこと
//! - 一部の宛先への送信失敗が他の宛先への配送を妨げないこと
//! - 送信失敗が宛先の切断処理を引き起こさないこと（Registry は変更されない）

use std::sync::Arc;

use futures_util::future::join_all;

use crate::domain::{ChatMessage, MessagePusher, SessionRegistry};

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose queue accepted the line
    pub delivered: usize,
    /// Recipients skipped after a push error
    pub failed: usize,
}

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    /// Registry（ブロードキャスト対象の取得）
    registry: Arc<dyn SessionRegistry>,
    /// MessagePusher（宛先ごとの送信）
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastUseCase {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// `message` を snapshot 時点の全セッションへ配送する
    ///
    /// Registry のロックは snapshot 取得時のみ保持され、送信中は保持しない。
    /// 宛先ごとの送信は並行に行われ、失敗はログに残して集計するだけ。
    pub async fn execute(&self, message: &ChatMessage) -> BroadcastReport {
        let recipients = self.registry.snapshot().await;
        let line = message.to_wire();

        let results = join_all(
            recipients
                .iter()
                .map(|recipient| self.message_pusher.push_to(recipient, &line)),
        )
        .await;

        let mut report = BroadcastReport::default();
        for (recipient, result) in recipients.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to push message to session '{}' ({}): {}",
                        recipient.id,
                        recipient.nickname,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            "Broadcasted message from '{}' to {} session(s), {} failed",
            message.sender,
            report.delivered,
            report.failed
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessagePushError, MockMessagePusher, Nickname, Rgb, SessionHandle, SessionId,
        },
        infrastructure::{ChannelMessagePusher, InMemorySessionRegistry},
    };
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn create_handle(nickname: &str) -> (SessionHandle, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = SessionHandle {
            id: SessionId::new(),
            nickname: Nickname::new(nickname).unwrap(),
            color: Rgb::DEFAULT,
            outbound: tx,
        };
        (handle, rx)
    }

    fn hello_from_alice() -> ChatMessage {
        ChatMessage::from_session(&Nickname::new("alice").unwrap(), Rgb::BLUE, "hello")
    }

    #[tokio::test]
    async fn test_every_recipient_receives_exactly_one_copy() {
        // テスト項目: snapshot 時点の全セッションにちょうど 1 通ずつ届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(ChannelMessagePusher::new(Duration::from_millis(100)));
        let usecase = BroadcastUseCase::new(registry.clone(), pusher);

        let mut receivers = Vec::new();
        for name in ["alice", "bob", "charlie"] {
            let (handle, rx) = create_handle(name);
            registry.join(handle).await;
            receivers.push(rx);
        }

        // when (操作):
        let report = usecase.execute(&hello_from_alice()).await;

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                delivered: 3,
                failed: 0
            }
        );
        for rx in receivers.iter_mut() {
            assert_eq!(rx.recv().await, Some("alice|255|hello".to_string()));
            assert!(rx.try_recv().is_err(), "expected exactly one copy");
        }
    }

    #[tokio::test]
    async fn test_failure_for_one_recipient_does_not_stop_others() {
        // テスト項目: 一部の宛先への送信失敗が他の宛先への配送を妨げない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let (alice, _alice_rx) = create_handle("alice");
        let (bob, _bob_rx) = create_handle("bob");
        let (charlie, _charlie_rx) = create_handle("charlie");
        let bob_id = bob.id;
        registry.join(alice).await;
        registry.join(bob).await;
        registry.join(charlie).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(3)
            .returning(move |recipient, _line| {
                if recipient.id == bob_id {
                    Err(MessagePushError::Closed)
                } else {
                    Ok(())
                }
            });
        let usecase = BroadcastUseCase::new(registry.clone(), Arc::new(pusher));

        // when (操作):
        let report = usecase.execute(&hello_from_alice()).await;

        // then (期待する結果):
        assert_eq!(
            report,
            BroadcastReport {
                delivered: 2,
                failed: 1
            }
        );
        // 送信失敗は切断扱いにしない
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn test_stalled_recipient_is_skipped_after_timeout() {
        // テスト項目: キューが詰まった宛先はタイムアウト後に諦め、他の宛先には届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(ChannelMessagePusher::new(Duration::from_millis(20)));
        let usecase = BroadcastUseCase::new(registry.clone(), pusher);

        let (tx, _stalled_rx) = mpsc::channel(1);
        tx.try_send("backlog".to_string()).unwrap();
        let stalled = SessionHandle {
            id: SessionId::new(),
            nickname: Nickname::new("slow").unwrap(),
            color: Rgb::DEFAULT,
            outbound: tx,
        };
        let (healthy, mut healthy_rx) = create_handle("fast");
        registry.join(stalled).await;
        registry.join(healthy).await;

        // when (操作):
        let report = usecase.execute(&hello_from_alice()).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(healthy_rx.recv().await, Some("alice|255|hello".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_registry() {
        // テスト項目: 宛先がいなくてもエラーにならない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().never();
        let usecase = BroadcastUseCase::new(registry, Arc::new(pusher));

        // when (操作):
        let report = usecase.execute(&hello_from_alice()).await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn test_messages_from_one_sender_arrive_in_order() {
        // テスト項目: 同じ送信者のメッセージは全宛先で送信順に届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let pusher = Arc::new(ChannelMessagePusher::new(Duration::from_millis(100)));
        let usecase = BroadcastUseCase::new(registry.clone(), pusher);
        let (alice, mut alice_rx) = create_handle("alice");
        let (bob, mut bob_rx) = create_handle("bob");
        registry.join(alice).await;
        registry.join(bob).await;
        let nickname = Nickname::new("alice").unwrap();

        // when (操作):
        for text in ["m1", "m2", "m3"] {
            usecase
                .execute(&ChatMessage::from_session(&nickname, Rgb::BLUE, text))
                .await;
        }

        // then (期待する結果):
        for rx in [&mut alice_rx, &mut bob_rx] {
            assert_eq!(rx.recv().await, Some("alice|255|m1".to_string()));
            assert_eq!(rx.recv().await, Some("alice|255|m2".to_string()));
            assert_eq!(rx.recv().await, Some("alice|255|m3".to_string()));
        }
    }
}
