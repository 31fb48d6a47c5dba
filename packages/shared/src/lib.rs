//! Shared building blocks for the Tsudoi chat server and client.
//!
//! - [`protocol`]: the newline-delimited wire protocol (handshake directives
//!   and `sender|rgb|text` broadcast lines)
//! - [`logger`]: tracing subscriber setup used by both binaries

pub mod logger;
pub mod protocol;
