//! Line-oriented TCP chat server.
//!
//! Each client sends `NICK:<nickname>`, optionally `COLOR:<rgb>`, then chat
//! lines. Every line is broadcast to all connected clients as
//! `<sender>|<rgb>|<text>`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 1234 --max-connections 256
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tsudoi_server::{
    ServerConfig,
    config::{DEFAULT_HOST, DEFAULT_OUTBOUND_CAPACITY, DEFAULT_PORT},
    infrastructure::{ChannelMessagePusher, InMemorySessionRegistry},
    ui::Server,
    usecase::{BroadcastUseCase, JoinSessionUseCase, LeaveSessionUseCase, SendMessageUseCase},
};
use tsudoi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "TCP chat server with nickname colors and broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Give up on a recipient whose queue stays full this long (milliseconds)
    #[arg(long, default_value_t = 5000)]
    send_timeout_ms: u64,

    /// Lines buffered per client before broadcasts start waiting
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Maximum number of concurrently handled connections (unbounded if omitted)
    #[arg(long)]
    max_connections: Option<usize>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            send_timeout: Duration::from_millis(args.send_timeout_ms),
            outbound_capacity: args.outbound_capacity,
            max_connections: args.max_connections,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Registry (in-memory)
    let registry = Arc::new(InMemorySessionRegistry::new());

    // 2. Create MessagePusher (bounded channel per session)
    let message_pusher = Arc::new(ChannelMessagePusher::new(config.send_timeout));

    // 3. Create UseCases
    let broadcast_usecase = Arc::new(BroadcastUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let join_session_usecase = Arc::new(JoinSessionUseCase::new(
        registry.clone(),
        broadcast_usecase.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(broadcast_usecase.clone()));
    let leave_session_usecase = Arc::new(LeaveSessionUseCase::new(
        registry.clone(),
        broadcast_usecase.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        config,
        join_session_usecase,
        send_message_usecase,
        leave_session_usecase,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
