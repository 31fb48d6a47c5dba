//! UseCase layer
//!
//! セッションの参加・発言・退出と、それに伴うブロードキャストを組み立てる。

mod broadcast;
mod join_session;
mod leave_session;
mod send_message;

pub use broadcast::{BroadcastReport, BroadcastUseCase};
pub use join_session::JoinSessionUseCase;
pub use leave_session::LeaveSessionUseCase;
pub use send_message::SendMessageUseCase;
