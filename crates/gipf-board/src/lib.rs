//! Board engine for GIPF.
//!
//! Everything here is pure game rules with no I/O:
//!
//! - **Geometry** ([`Coord`], [`Direction`], [`entry_directions`]): the
//!   61-point hexagon, neighbour stepping, and where pieces may enter.
//! - **Lines** ([`Line`], [`lines`]): the straight runs checked for
//!   captures, computed once.
//! - **Board** ([`Board`], [`Color`]): placement with pushing, capture
//!   resolution, reserves, and the win check.
//!
//! # How it fits in the stack
//!
//! ```text
//! Session (server)  ──┐
//!                     ├──→ Board (this crate)
//! Client replica   ───┘
//! ```
//!
//! The server's session owns the authoritative board; each client keeps a
//! replica it updates from the server's `MakeMove` messages.

mod board;
mod coord;
mod error;
mod lines;

pub use board::{Board, Capture, Color, CAPTURE_RUN, INITIAL_RESERVE};
pub use coord::{entry_directions, Coord, Direction, GRID_LETTERS};
pub use error::BoardError;
pub use lines::{lines, Line};
