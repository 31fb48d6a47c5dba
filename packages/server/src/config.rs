//! Server configuration.

use std::time::Duration;

/// Port existing clients connect to by default.
pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// Runtime settings for [`crate::ui::Server`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind to (0 picks an ephemeral port)
    pub port: u16,
    /// Longest time a broadcast waits on one recipient's full outbound queue
    pub send_timeout: Duration,
    /// Number of lines buffered per session before sends start waiting
    pub outbound_capacity: usize,
    /// Upper bound on concurrently handled connections, `None` for unbounded
    pub max_connections: Option<usize>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Capacity for a session's outbound queue; never zero.
    pub fn outbound_queue_capacity(&self) -> usize {
        self.outbound_capacity.max(1)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            max_connections: None,
        }
    }
}
