//! `GipfServer` builder and accept loop.
//!
//! Ties the layers together: TCP transport → codec → one shared
//! [`GameSession`].

use std::net::SocketAddr;
use std::sync::Arc;

use gipf_board::Board;
use gipf_protocol::{BinaryCodec, Codec};
use gipf_session::{GameSession, SessionConfig};
use gipf_transport::{Transport, TcpTransport};

use crate::handler::handle_connection;
use crate::GipfError;

/// Where the server listens unless told otherwise.
pub const DEFAULT_BIND_ADDR: &str = "localhost:2222";

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port` to listen on. Port 0 picks a free port.
    pub bind_addr: String,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session: SessionConfig::default(),
        }
    }
}

/// Shared by every connection handler task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) session: GameSession,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a GIPF server.
///
/// # Example
///
/// ```rust,no_run
/// use gipf::prelude::*;
///
/// # async fn serve() -> Result<(), GipfError> {
/// let server = GipfServer::builder()
///     .bind("0.0.0.0:2222")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GipfServerBuilder {
    config: ServerConfig,
    board: Option<Board>,
}

impl GipfServerBuilder {
    pub fn new() -> Self {
        Self::from(ServerConfig::default())
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Starts the game from `board` instead of the opening position.
    /// Clients must be given the same board.
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Binds the listener using the binary wire format.
    pub async fn build(self) -> Result<GipfServer<BinaryCodec>, GipfError> {
        self.build_with_codec(BinaryCodec).await
    }

    /// Binds the listener using `codec` for every message.
    pub async fn build_with_codec<C: Codec>(self, codec: C) -> Result<GipfServer<C>, GipfError> {
        let transport = TcpTransport::bind(&self.config.bind_addr).await?;

        let session = match self.board {
            Some(board) => GameSession::with_board(self.config.session, board),
            None => GameSession::new(self.config.session),
        };
        let state = Arc::new(ServerState { session, codec });

        Ok(GipfServer { transport, state })
    }
}

impl From<ServerConfig> for GipfServerBuilder {
    fn from(config: ServerConfig) -> Self {
        Self {
            config,
            board: None,
        }
    }
}

impl Default for GipfServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound GIPF server hosting a single game.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GipfServer<C: Codec = BinaryCodec> {
    transport: TcpTransport,
    state: Arc<ServerState<C>>,
}

impl GipfServer<BinaryCodec> {
    pub fn builder() -> GipfServerBuilder {
        GipfServerBuilder::new()
    }
}

impl<C: Codec> GipfServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning one handler task per connection.
    ///
    /// The first two players to join share the game; everyone after them
    /// is told the game is full. A failing connection never stops the loop.
    pub async fn run(mut self) -> Result<(), GipfError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "GIPF server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
