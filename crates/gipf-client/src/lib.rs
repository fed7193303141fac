//! Client side of a GIPF game.
//!
//! [`ClientSession`] tracks whose turn it is and keeps a replica of the
//! server's board; [`ServerConnection`] moves [`Message`]s over TCP. The
//! two are independent: a front end reads from the connection, feeds
//! [`ClientSession::handle_message`], and sends whatever the session's
//! input methods return.
//!
//! ```rust,no_run
//! use gipf_client::{ClientSession, ServerConnection};
//!
//! # async fn play() -> Result<(), gipf_client::ClientError> {
//! let conn = ServerConnection::connect("localhost:2222").await?;
//! conn.join("alice").await?;
//!
//! let mut game = ClientSession::new();
//! while let Some(msg) = conn.recv().await? {
//!     game.handle_message(msg)?;
//!     if game.winner().is_some() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Message`]: gipf_protocol::Message

mod connection;
mod error;
mod state;

pub use connection::ServerConnection;
pub use error::ClientError;
pub use state::{ClientSession, ClientState};
