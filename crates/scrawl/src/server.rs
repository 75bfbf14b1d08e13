//! `ScrawlServer` builder and server loop.
//!
//! This is the entry point for running a Scrawl game server. It ties
//! together all the layers: transport → protocol → session → room.

use std::future::Future;
use std::sync::Arc;

use scrawl_protocol::{Codec, JsonCodec};
use scrawl_room::{RoomConfig, RoomRegistry, WordBank};
use scrawl_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{ScrawlError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The registry
/// sits behind a `Mutex` so room creation and teardown are serialized.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Scrawl server.
///
/// # Example
///
/// ```rust,no_run
/// use scrawl::prelude::*;
///
/// # async fn start() -> Result<(), ScrawlError> {
/// let server = ScrawlServer::builder()
///     .bind("127.0.0.1:3000")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ScrawlServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    words: WordBank,
}

impl ScrawlServerBuilder {
    /// Creates a new builder listening on `0.0.0.0:3000` with default
    /// rooms and the built-in word list.
    pub fn new() -> Self {
        Self {
            bind_addr: ServerConfig::default().addr(),
            room_config: RoomConfig::default(),
            words: WordBank::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Takes the listen address from a [`ServerConfig`].
    pub fn config(mut self, config: &ServerConfig) -> Self {
        self.bind_addr = config.addr();
        self
    }

    /// Sets the configuration every new room starts with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Replaces the built-in word list.
    pub fn word_bank(mut self, words: WordBank) -> Self {
        self.words = words;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`, which is what the
    /// browser client speaks.
    pub async fn build(self) -> Result<ScrawlServer, ScrawlError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(self.room_config, self.words)),
            codec: JsonCodec,
        });

        Ok(ScrawlServer { transport, state })
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Scrawl game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer {
    transport: WebSocketTransport,
    state: Arc<ServerState<JsonCodec>>,
}

impl ScrawlServer {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ScrawlError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` completes, then stops every
    /// room and closes the listener.
    ///
    /// Each accepted connection gets its own handler task. Accept failures
    /// are logged and don't stop the loop.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), ScrawlError> {
        tracing::info!("Scrawl server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                accepted = self.transport.accept() => match accepted {
                    Ok(conn) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(
                                    error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }

        tracing::info!("Scrawl server shutting down");
        self.state.registry.lock().await.shutdown_all().await;
        self.transport.shutdown().await?;
        Ok(())
    }
}
