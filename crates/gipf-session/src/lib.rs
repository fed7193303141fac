//! Server-side game session for GIPF.
//!
//! A [`GameSession`] is the single authority for one match: it seats two
//! players on a first-come-first-served basis, flips a coin for colours,
//! applies moves to the one shared board, and broadcasts the results.
//!
//! # Key types
//!
//! - [`GameSession`]: join, wait for start, apply moves, leave
//! - [`MoveOutcome`]: what a submitted move did
//! - [`SessionState`]: lifecycle state machine
//! - [`SessionConfig`]: session settings
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection handlers (above)  ← one task per client, share one session
//!     ↕
//! Session (this crate)  ← roster lock + board lock
//!     ↕
//! Board engine / Protocol (below)
//! ```

mod config;
mod error;
mod session;

pub use config::{PlayerId, SessionConfig, SessionState};
pub use error::SessionError;
pub use session::{GameSession, MoveOutcome, PlayerSender, MAX_PLAYERS};
