//! TCP connection handler.
//!
//! One task per accepted connection drives the session state machine:
//! handshake (`Registering`), the read loop (`Active`) and cleanup (`Closed`).
//! Outbound lines are written by a separate writer task that drains the
//! session's bounded queue, so broadcasts never touch the socket directly.
//!
//! A second handshake line that is not a `COLOR:` directive is not discarded:
//! the session gets the default color and the line becomes its first chat
//! message. Inbound bytes that are not valid UTF-8 are relayed with U+FFFD in
//! their place instead of ending the session.

use std::{net::SocketAddr, sync::Arc};

use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tsudoi_shared::protocol::{self, ProtocolError};

use crate::{
    domain::{Nickname, Rgb, Session, SessionHandle, SessionId},
    ui::state::AppState,
};

/// Errors that end a session before it becomes active.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("connection I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed during handshake")]
    Disconnected,
}

/// Identity negotiated by the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub nickname: Nickname,
    pub color: Rgb,
    /// Second line when it was not a `COLOR:` directive; relayed as the
    /// session's first chat message once active.
    pub first_message: Option<String>,
}

/// Read one line without its `\n` or `\r\n` terminator.
///
/// Invalid UTF-8 is replaced with U+FFFD. Returns `None` at end-of-stream.
pub async fn read_line_lossy<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read `NICK:<nickname>` and the optional `COLOR:<i32>` line.
pub async fn read_handshake<R>(reader: &mut R) -> Result<Handshake, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    let first = read_line_lossy(reader)
        .await?
        .ok_or(SessionError::Disconnected)?;
    let nickname = Nickname::new(protocol::parse_nick_directive(&first)?)?;

    let second = read_line_lossy(reader)
        .await?
        .ok_or(SessionError::Disconnected)?;
    match protocol::parse_color_directive(&second) {
        Some(color) => Ok(Handshake {
            nickname,
            color: color?,
            first_message: None,
        }),
        None => Ok(Handshake {
            nickname,
            color: Rgb::DEFAULT,
            first_message: Some(second),
        }),
    }
}

/// Drive one connection from accept to close.
///
/// Never returns an error: handshake failures drop the connection silently
/// and I/O failures while active count as a disconnect.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let mut session = Session::new(SessionId::new());
    let session_id = session.id();
    tracing::info!("Session '{}' connected from {}", session_id, peer);

    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    if let Err(e) = session.begin_registration() {
        tracing::error!("Session '{}': {}", session_id, e);
        return;
    }

    let handshake = match read_handshake(&mut reader).await {
        Ok(handshake) => handshake,
        Err(e) => {
            tracing::warn!(
                "Session '{}' from {} dropped during handshake: {}",
                session_id,
                peer,
                e
            );
            session.close();
            close_writer(write_half, session_id).await;
            return;
        }
    };

    let (tx, rx) = mpsc::channel(state.config.outbound_queue_capacity());
    let handle = match session.activate(handshake.nickname, handshake.color, tx) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Session '{}': {}", session_id, e);
            return;
        }
    };

    let mut send_task = pusher_loop(rx, write_half, session_id);
    state.join_session_usecase.execute(handle.clone()).await;

    let (stop_tx, stop_rx) = oneshot::channel();
    let mut recv_task = tokio::spawn(receive_loop(
        reader,
        state.clone(),
        handle.clone(),
        handshake.first_message,
        stop_rx,
    ));

    // The reader is never aborted, so a line already being broadcast still
    // reaches every session in its snapshot.
    let reader_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    if reader_finished {
        send_task.abort();
        // the socket is closed once the writer task is gone
        let _ = send_task.await;
    } else {
        let _ = stop_tx.send(());
        let _ = recv_task.await;
    }

    if session.close() {
        state.leave_session_usecase.execute(&handle).await;
    }
}

/// Read lines until end-of-stream, a read error or `stop`, broadcasting each one.
///
/// `stop` is only observed while waiting for the next line.
async fn receive_loop<R>(
    mut reader: R,
    state: Arc<AppState>,
    session: SessionHandle,
    first_message: Option<String>,
    mut stop: oneshot::Receiver<()>,
) where
    R: AsyncBufRead + Unpin,
{
    if let Some(text) = first_message {
        state.send_message_usecase.execute(&session, text).await;
    }

    loop {
        let read = tokio::select! {
            biased;
            read = read_line_lossy(&mut reader) => read,
            _ = &mut stop => {
                tracing::info!(
                    "Session '{}' ({}) stopped reading after its writer closed",
                    session.id,
                    session.nickname
                );
                break;
            }
        };

        match read {
            Ok(Some(text)) => {
                state.send_message_usecase.execute(&session, text).await;
            }
            Ok(None) => {
                tracing::info!(
                    "Session '{}' ({}) closed the connection",
                    session.id,
                    session.nickname
                );
                break;
            }
            Err(e) => {
                tracing::info!(
                    "Session '{}' ({}) read failed, treating as disconnect: {}",
                    session.id,
                    session.nickname,
                    e
                );
                break;
            }
        }
    }
}

/// Spawns a task that drains the session's outbound queue into its socket.
///
/// # Returns
///
/// A `JoinHandle` that completes when a write fails or the queue closes
fn pusher_loop<W>(
    mut rx: mpsc::Receiver<String>,
    mut writer: W,
    session_id: SessionId,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = write_line(&mut writer, &line).await {
                tracing::info!("Session '{}' write failed: {}", session_id, e);
                break;
            }
        }
        close_writer(writer, session_id).await;
    })
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut framed = String::with_capacity(line.len() + 1);
    framed.push_str(line);
    framed.push('\n');
    writer.write_all(framed.as_bytes()).await?;
    writer.flush().await
}

async fn close_writer<W>(mut writer: W, session_id: SessionId)
where
    W: AsyncWrite + Unpin,
{
    if let Err(e) = writer.shutdown().await {
        tracing::debug!(
            "Failed to close connection of session '{}': {}",
            session_id,
            e
        );
    }
}
