//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::Semaphore};

use crate::{
    config::ServerConfig,
    usecase::{JoinSessionUseCase, LeaveSessionUseCase, SendMessageUseCase},
};

use super::{
    error::ServerError, handler::handle_connection, signal::shutdown_signal, state::AppState,
};

/// Pause before accepting again after a failed accept (e.g. file descriptor exhaustion).
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// TCP chat server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     config,
///     join_session_usecase,
///     send_message_usecase,
///     leave_session_usecase,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address, send timeout and connection limits
    /// * `join_session_usecase` - UseCase for session registration
    /// * `send_message_usecase` - UseCase for relaying chat lines
    /// * `leave_session_usecase` - UseCase for session disconnection
    pub fn new(
        config: ServerConfig,
        join_session_usecase: Arc<JoinSessionUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        leave_session_usecase: Arc<LeaveSessionUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                join_session_usecase,
                send_message_usecase,
                leave_session_usecase,
                config,
            }),
        }
    }

    /// Bind the configured address and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Bind the listening socket described by the configuration.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.state.config.bind_addr();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Each connection is handled on its own task. A failed accept is logged
    /// and the loop carries on after a short pause.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let limiter = self
            .state
            .config
            .max_connections
            .map(|max| Arc::new(Semaphore::new(max)));

        tokio::pin!(shutdown);

        loop {
            // Wait for a free slot before accepting when connections are bounded
            let permit = match &limiter {
                Some(limiter) => tokio::select! {
                    _ = &mut shutdown => break,
                    permit = limiter.clone().acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => break,
                    },
                },
                None => None,
            };

            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                },
            };

            tracing::debug!("New client connected from {}", peer);
            let state = self.state.clone();
            tokio::spawn(async move {
                handle_connection(stream, peer, state).await;
                drop(permit);
            });
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
