//! The client's end of the socket.

use std::collections::VecDeque;

use gipf_protocol::{BinaryCodec, Codec, Message, GAME_FULL};
use gipf_transport::{Connection, TcpConnection};
use tokio::sync::Mutex;

use crate::ClientError;

/// A connection to a GIPF server that speaks whole [`Message`]s.
///
/// `send` and `recv` take `&self`, so one task can wait for server messages
/// while another submits moves.
pub struct ServerConnection<C: Codec = BinaryCodec> {
    conn: TcpConnection,
    codec: C,
    /// Messages already decoded from a read that carried more than one.
    pending: Mutex<VecDeque<Message>>,
}

impl ServerConnection<BinaryCodec> {
    /// Connects to `addr` (`host:port`) using the binary wire format.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Self::connect_with_codec(addr, BinaryCodec).await
    }
}

impl<C: Codec> ServerConnection<C> {
    pub async fn connect_with_codec(addr: &str, codec: C) -> Result<Self, ClientError> {
        let conn = TcpConnection::connect(addr).await?;
        tracing::info!(addr, conn_id = %conn.id(), "connected to server");
        Ok(Self {
            conn,
            codec,
            pending: Mutex::new(VecDeque::new()),
        })
    }

    /// Asks for a seat under `player_name`. The answer is a `StartGame`
    /// once a second player arrives, or [`ClientError::GameFull`] from
    /// [`recv`](Self::recv).
    pub async fn join(&self, player_name: &str) -> Result<(), ClientError> {
        self.send(&Message::JoinGame {
            player_name: player_name.to_string(),
        })
        .await
    }

    pub async fn send(&self, msg: &Message) -> Result<(), ClientError> {
        let bytes = self.codec.encode(msg)?;
        self.conn.send(&bytes).await?;
        tracing::debug!(kind = %msg.kind(), "sent");
        Ok(())
    }

    /// Waits for the next message from the server.
    ///
    /// Returns `Ok(None)` once the server has closed the connection and
    /// every buffered message has been handed out.
    ///
    /// # Errors
    /// [`ClientError::GameFull`] if the server turned us away,
    /// [`ClientError::Protocol`] for bytes that are not messages.
    pub async fn recv(&self) -> Result<Option<Message>, ClientError> {
        let mut pending = self.pending.lock().await;
        if let Some(msg) = pending.pop_front() {
            return Ok(Some(msg));
        }

        let Some(data) = self.conn.recv().await? else {
            tracing::debug!("server closed the connection");
            return Ok(None);
        };
        if data.as_slice() == GAME_FULL {
            return Err(ClientError::GameFull);
        }

        pending.extend(self.codec.decode_all(&data)?);
        Ok(pending.pop_front())
    }

    /// Like [`recv`](Self::recv), but a closed connection is an error.
    pub async fn expect_message(&self) -> Result<Message, ClientError> {
        self.recv().await?.ok_or(ClientError::Disconnected)
    }

    /// Leaves the game and closes our side of the connection.
    pub async fn quit(self) -> Result<(), ClientError> {
        self.send(&Message::QuitGame).await?;
        self.conn.close().await?;
        Ok(())
    }

    /// Announces an abrupt exit and closes our side of the connection.
    pub async fn shutdown(self) -> Result<(), ClientError> {
        self.send(&Message::Shutdown).await?;
        self.conn.close().await?;
        Ok(())
    }
}
