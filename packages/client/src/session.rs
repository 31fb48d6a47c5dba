//! TCP client session management.

use chrono::{DateTime, Local};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};
use tsudoi_shared::protocol::{self, ChatLine, Rgb};

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Build the `NICK:` / `COLOR:` handshake sent right after connecting.
pub fn handshake(nickname: &str, color: Rgb) -> Result<String, ClientError> {
    let nick = protocol::nick_directive(nickname);
    protocol::parse_nick_directive(&nick)?;
    Ok(format!("{}\n{}\n", nick, protocol::color_directive(color)))
}

/// Turn one received line into display text.
pub fn render_incoming(line: &str, received_at: &DateTime<Local>) -> String {
    match ChatLine::decode(line) {
        Ok(chat_line) => MessageFormatter::format_chat_line(&chat_line, received_at),
        Err(e) => {
            tracing::debug!("Failed to decode line: {}", e);
            MessageFormatter::format_raw_message(line)
        }
    }
}

/// Run the chat client session
///
/// Connects, registers `nickname` and `color`, then relays stdin lines to the
/// server while printing every broadcast line.
pub async fn run_client_session(
    host: &str,
    port: u16,
    nickname: &str,
    color: Rgb,
) -> Result<(), ClientError> {
    let handshake = handshake(nickname, color)?;

    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (read_half, mut write) = stream.into_split();

    write
        .write_all(handshake.as_bytes())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server at {}:{} as '{}'", host, port, nickname);

    // Spawn a task to handle incoming lines
    let nickname_for_read = nickname.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    print!("{}", render_incoming(&line, &Local::now()));
                    redisplay_prompt(&nickname_for_read);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    break;
                }
            }
        }
        print!(
            "{}",
            MessageFormatter::format_local_notice("Disconnected from server")
        );
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", nickname);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                        if input_tx.send(line).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to send stdin lines to the server
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let framed = format!("{}\n", line);
            if let Err(e) = write.write_all(framed.as_bytes()).await {
                tracing::warn!("Failed to send message: {}", e);
                return true;
            }
        }
        false
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Err(ClientError::ConnectionError(
                "Connection closed by server".to_string(),
            ))
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            Ok(())
        }
    }
}
