//! Session configuration, player identity, and the lifecycle state machine.

use std::fmt;

/// Identifies one connected player for the lifetime of their connection.
///
/// The server derives it from the connection id, so two players with the
/// same name are still told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Seed for the colour coin flip. `None` draws from the thread RNG;
    /// a fixed seed makes the assignment reproducible.
    pub color_seed: Option<u64>,
}

/// The lifecycle state of a session.
///
/// ```text
/// WaitingForPlayers ──(second join)──→ Playing ──(winner / player left)──→ Finished
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    WaitingForPlayers,
    Playing,
    Finished,
}

impl SessionState {
    /// Returns `true` while seats are still open.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::WaitingForPlayers)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::Playing => write!(f, "Playing"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
