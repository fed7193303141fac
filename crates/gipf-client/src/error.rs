//! Error types for the client.

use gipf_board::{BoardError, Coord, Direction};
use gipf_protocol::{MessageKind, ProtocolError};
use gipf_transport::TransportError;

/// Errors that can occur on the client side of a game.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server sent bytes that are not a valid message.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server already has two players.
    #[error("game is full")]
    GameFull,

    /// A message arrived that makes no sense in the current state.
    #[error("unexpected {0} message")]
    UnexpectedMessage(MessageKind),

    /// The server broadcast a move the local board refuses. The replica
    /// no longer matches the server's board.
    #[error("server move does not fit the local board: {0}")]
    Desync(BoardError),

    /// The local board says this move cannot be played.
    #[error("illegal move at {0} in direction {1}")]
    IllegalMove(Coord, Direction),

    /// Pieces can only be introduced from a perimeter point.
    #[error("{0} is not an entry point")]
    NotAnEntryPoint(Coord),

    /// The direction is not one of those offered for the chosen cell.
    #[error("direction {0} is not offered here")]
    InvalidDirection(Direction),

    /// The server named a colour that does not exist.
    #[error("invalid colour value {0}")]
    InvalidColor(i8),

    /// The server hung up.
    #[error("disconnected from server")]
    Disconnected,
}
