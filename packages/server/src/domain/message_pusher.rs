//! MessagePusher trait 定義
//!
//! 1 つの宛先セッションへ 1 行を届けるためのインターフェース。
//! どの宛先に配るかの判断は UseCase 層（ブロードキャスト）が行う。

use async_trait::async_trait;

use super::{MessagePushError, SessionHandle};

/// 宛先セッションへの送信を抽象化する trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// `recipient` の送信キューに `line` を積む
    ///
    /// 失敗は宛先単位で返され、呼び出し側の他の宛先への送信には影響しない。
    async fn push_to(
        &self,
        recipient: &SessionHandle,
        line: &str,
    ) -> Result<(), MessagePushError>;
}
