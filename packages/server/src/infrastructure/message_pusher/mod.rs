//! メッセージ送信（通知）の実装
//!
//! ## 実装
//!
//! - `channel`: セッションごとの有界 mpsc キューへ積む実装
//!   （ソケットへの書き込みは各セッションの writer タスクが行う）

pub mod channel;

pub use channel::ChannelMessagePusher;
