//! The seven messages exchanged between clients and the server.
//!
//! Every field other than the player name is a small signed integer, kept
//! in its wire form here. Turning those into board coordinates, directions,
//! and colours is the job of the layers above; this crate only moves bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A protocol message.
///
/// Client → server: [`JoinGame`](Message::JoinGame),
/// [`TryMove`](Message::TryMove), [`QuitGame`](Message::QuitGame),
/// [`Shutdown`](Message::Shutdown).
///
/// Server → client: [`StartGame`](Message::StartGame),
/// [`MakeMove`](Message::MakeMove),
/// [`DeclareWinner`](Message::DeclareWinner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// "I want to play, my name is ..."
    JoinGame { player_name: String },

    /// "Place a piece at (letter, number) and push it in `direction`."
    TryMove {
        letter: i8,
        number: i8,
        direction: i8,
    },

    /// The player is leaving the game.
    QuitGame,

    /// The client is going away abruptly.
    Shutdown,

    /// Both players are in; you play `color`.
    StartGame { color: i8 },

    /// A move was accepted. Sent to both players, including the mover.
    MakeMove {
        letter: i8,
        number: i8,
        direction: i8,
        color: i8,
    },

    /// The game is over.
    DeclareWinner { winner: i8 },
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::JoinGame { .. } => MessageKind::JoinGame,
            Self::TryMove { .. } => MessageKind::TryMove,
            Self::QuitGame => MessageKind::QuitGame,
            Self::Shutdown => MessageKind::Shutdown,
            Self::StartGame { .. } => MessageKind::StartGame,
            Self::MakeMove { .. } => MessageKind::MakeMove,
            Self::DeclareWinner { .. } => MessageKind::DeclareWinner,
        }
    }
}

/// The kind of a message, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    JoinGame,
    TryMove,
    QuitGame,
    Shutdown,
    StartGame,
    MakeMove,
    DeclareWinner,
}

impl MessageKind {
    pub const ALL: [MessageKind; 7] = [
        Self::JoinGame,
        Self::TryMove,
        Self::QuitGame,
        Self::Shutdown,
        Self::StartGame,
        Self::MakeMove,
        Self::DeclareWinner,
    ];

    /// The two ASCII bytes that open every encoded message.
    pub fn tag(self) -> [u8; 2] {
        match self {
            Self::JoinGame => *b"JG",
            Self::TryMove => *b"TM",
            Self::QuitGame => *b"QG",
            Self::Shutdown => *b"SD",
            Self::StartGame => *b"SG",
            Self::MakeMove => *b"MM",
            Self::DeclareWinner => *b"DW",
        }
    }

    /// Looks up a kind by its tag.
    pub fn from_tag(tag: [u8; 2]) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Number of payload bytes after the tag, or `None` for `JoinGame`,
    /// whose name runs to the end of the buffer.
    pub fn payload_len(self) -> Option<usize> {
        match self {
            Self::JoinGame => None,
            Self::QuitGame | Self::Shutdown => Some(0),
            Self::StartGame | Self::DeclareWinner => Some(1),
            Self::TryMove => Some(3),
            Self::MakeMove => Some(4),
        }
    }

    /// `true` for messages a client sends to the server.
    pub fn is_client_to_server(self) -> bool {
        matches!(
            self,
            Self::JoinGame | Self::TryMove | Self::QuitGame | Self::Shutdown
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        write!(f, "{}{}", tag[0] as char, tag[1] as char)
    }
}

/// Sent instead of a message to a player who tries to join a full game,
/// right before the server closes the connection.
pub const GAME_FULL: &[u8; 2] = b"GF";
