//! Tsudoi chat server library.
//!
//! Accepts TCP connections, performs the `NICK:`/`COLOR:` handshake and
//! broadcasts every received line to all registered sessions.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;

pub use config::ServerConfig;
