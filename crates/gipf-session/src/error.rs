//! Error types for the session layer.

use crate::PlayerId;

/// Errors that can occur while joining or playing a session.
///
/// An illegal move is *not* an error here: it is a normal
/// [`MoveOutcome::Rejected`](crate::MoveOutcome::Rejected).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Two players are already seated.
    #[error("game is full")]
    SessionFull,

    /// The player already holds a seat.
    #[error("player {0} already joined")]
    AlreadyJoined(PlayerId),

    /// The player never joined this session.
    #[error("player {0} is not in this game")]
    NotJoined(PlayerId),

    /// Still waiting for a second player.
    #[error("game has not started")]
    NotStarted,

    /// A winner was declared or a player left.
    #[error("game is over")]
    Finished,
}
