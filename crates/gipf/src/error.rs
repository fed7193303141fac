//! Unified error type for the GIPF server.

use gipf_board::BoardError;
use gipf_client::ClientError;
use gipf_protocol::{MessageKind, ProtocolError};
use gipf_session::SessionError;
use gipf_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// `#[from]` on each variant lets `?` convert layer errors directly, on
/// the server and in programs written against the prelude alike.
#[derive(Debug, thiserror::Error)]
pub enum GipfError {
    /// Socket failure: bind, accept, send, or receive.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Bytes that are not a valid message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Joining or playing outside the session's rules.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A move the board refuses.
    ///
    /// The server reports refused moves as [`MoveOutcome::Rejected`]
    /// instead; this variant is for programs driving a [`gipf_board::Board`]
    /// directly through the prelude.
    ///
    /// [`MoveOutcome::Rejected`]: gipf_session::MoveOutcome::Rejected
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Client-side failure.
    ///
    /// Never produced by the server. Client front ends built on
    /// [`gipf_client`] use it to fold their errors into the same type.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A client sent a message only the server may send.
    #[error("client sent server-only message {0}")]
    UnexpectedMessage(MessageKind),
}
