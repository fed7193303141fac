//! # GIPF
//!
//! A networked two-player GIPF game: an authoritative server holding the
//! one shared board, and the pieces a client needs to follow along.
//!
//! The workspace is layered, leaf first:
//!
//! - `gipf-board`: grid geometry, push moves, capture resolution
//! - `gipf-protocol`: the seven messages and their wire codecs
//! - `gipf-transport`: plain TCP connections
//! - `gipf-session`: pairing, colour assignment, move serialization
//! - `gipf-client`: the client's turn state machine and server connection
//!
//! This crate adds the server itself and re-exports the rest.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gipf::prelude::*;
//!
//! # async fn serve() -> Result<(), GipfError> {
//! let server = GipfServerBuilder::new().bind("localhost:2222").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GipfError;
pub use server::{GipfServer, GipfServerBuilder, ServerConfig, DEFAULT_BIND_ADDR};

pub use gipf_board as board;
pub use gipf_client as client;
pub use gipf_protocol as protocol;
pub use gipf_session as session;
pub use gipf_transport as transport;

/// Everything needed to run a server or write a client.
pub mod prelude {
    pub use crate::{GipfError, GipfServer, GipfServerBuilder, ServerConfig, DEFAULT_BIND_ADDR};

    pub use gipf_board::{Board, Color, Coord, Direction};
    pub use gipf_client::{ClientError, ClientSession, ClientState, ServerConnection};
    pub use gipf_protocol::{BinaryCodec, Codec, JsonCodec, Message, MessageKind};
    pub use gipf_session::{GameSession, MoveOutcome, PlayerId, SessionConfig};
}
