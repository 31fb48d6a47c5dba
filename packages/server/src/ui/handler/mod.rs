//! Connection handlers.

pub mod connection;

pub use connection::{Handshake, SessionError, handle_connection, read_handshake};
