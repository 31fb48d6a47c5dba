//! Terminal chat client for the Tsudoi TCP server.
//!
//! Registers a nickname and color, then sends every stdin line as a chat
//! message while printing broadcasts with their sender's color.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-client -- --nickname Alice
//! cargo run --bin tsudoi-client -- -n Bob -c "#FF8800" -p 1234
//! ```

use clap::Parser;

use tsudoi_shared::{logger::setup_logger, protocol::Rgb};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-client")]
#[command(about = "Terminal chat client with colored nicknames", long_about = None)]
struct Args {
    /// Nickname shown to other participants
    #[arg(short = 'n', long)]
    nickname: String,

    /// Nickname color (`#RRGGBB`, `0xRRGGBB` or a decimal value)
    #[arg(short = 'c', long, default_value = "#0000FF")]
    color: Rgb,

    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value_t = 1234)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) =
        tsudoi_client::run_client_session(&args.host, args.port, &args.nickname, args.color).await
    {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
