//! Shared state handed to every connection handler.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    usecase::{JoinSessionUseCase, LeaveSessionUseCase, SendMessageUseCase},
};

/// Shared application state
pub struct AppState {
    /// JoinSessionUseCase（セッション参加のユースケース）
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveSessionUseCase（セッション退出のユースケース）
    pub leave_session_usecase: Arc<LeaveSessionUseCase>,
    /// 実行時設定
    pub config: ServerConfig,
}
