//! Error types for the board engine.

use crate::{Color, Coord, Direction};

/// Reasons a move or a wire value is rejected by the board.
///
/// Every variant is an "illegal move": the board is left untouched and
/// the caller may simply try something else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The coordinate pair is not on the 61-point grid.
    #[error("invalid coordinate ({letter}, {number})")]
    InvalidCoordinate { letter: i8, number: i8 },

    /// Directions are numbered 1 through 6.
    #[error("invalid direction {0}")]
    InvalidDirection(i8),

    /// Colours are 1 (white) or 2 (black).
    #[error("invalid color {0}")]
    InvalidColor(i8),

    /// Pieces can only be introduced at a perimeter point.
    #[error("{0} is not an entry point")]
    NotAnEntryPoint(Coord),

    /// The direction does not lead inward from this entry point.
    #[error("cannot enter at {0} in direction {1}")]
    IllegalEntryDirection(Coord, Direction),

    /// Every cell from the entry point to the far edge is occupied.
    #[error("line from {0} in direction {1} is full")]
    LineFull(Coord, Direction),

    /// The colour has no pieces left to place.
    #[error("{0} has no pieces in reserve")]
    ReserveExhausted(Color),
}
