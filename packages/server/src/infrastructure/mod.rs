//! Infrastructure layer
//!
//! ドメイン層が定義する trait の具体的な実装を提供します。
//!
//! - `registry`: セッション集合（インメモリ）
//! - `message_pusher`: 宛先セッションの送信キューへの配送

pub mod message_pusher;
pub mod registry;

pub use message_pusher::ChannelMessagePusher;
pub use registry::InMemorySessionRegistry;
