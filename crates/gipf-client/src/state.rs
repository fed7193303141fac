//! The client's view of a game: whose turn it is, what the local player is
//! in the middle of doing, and a replica of the server's board.
//!
//! ```text
//!                 StartGame(white)
//! WaitingForGame ─────────────────→ PlacingPiece ⇄ ChoosingDirection
//!       │                               │   ↑            │
//!       │ StartGame(black)     TryMove  │   │ MakeMove   │ TryMove
//!       ↓                               ↓   │            ↓
//! WaitingForPlayer ←──MakeMove── WaitingForServer ←──────┘
//!       │
//!       └─────────MakeMove──────────→ PlacingPiece
//!
//! any state ──DeclareWinner──→ GameOver
//! ```
//!
//! Nothing here is authoritative. Moves are only applied when the server
//! echoes them back, and captures are replayed with the same board rules
//! the server used.

use std::fmt;

use gipf_board::{Board, Color, Coord, Direction};
use gipf_protocol::Message;

use crate::ClientError;

/// Where the local player stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Joined, waiting for a second player.
    WaitingForGame,
    /// The opponent is to move.
    WaitingForPlayer,
    /// A move was sent; waiting for the server to echo it.
    WaitingForServer,
    /// Our turn: pick an entry point.
    PlacingPiece,
    /// The picked entry point has two directions; pick one.
    ChoosingDirection {
        cell: Coord,
        directions: &'static [Direction],
    },
    /// The server declared a winner.
    GameOver { winner: Color },
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForGame => write!(f, "WaitingForGame"),
            Self::WaitingForPlayer => write!(f, "WaitingForPlayer"),
            Self::WaitingForServer => write!(f, "WaitingForServer"),
            Self::PlacingPiece => write!(f, "PlacingPiece"),
            Self::ChoosingDirection { cell, .. } => write!(f, "ChoosingDirection{cell}"),
            Self::GameOver { winner } => write!(f, "GameOver({winner})"),
        }
    }
}

/// One player's game, driven by server messages and local input.
///
/// Input methods that produce a move return the [`Message::TryMove`] to
/// send; the caller owns the connection.
#[derive(Debug, Clone)]
pub struct ClientSession {
    state: ClientState,
    board: Board,
    color: Option<Color>,
}

impl ClientSession {
    pub fn new() -> Self {
        Self::with_board(Board::new())
    }

    /// Starts from `board` instead of the opening position. It must match
    /// the board the server starts from.
    pub fn with_board(board: Board) -> Self {
        Self {
            state: ClientState::WaitingForGame,
            board,
            color: None,
        }
    }

    // -----------------------------------------------------------------------
    // Server messages
    // -----------------------------------------------------------------------

    /// Advances the state machine with a message from the server.
    ///
    /// # Errors
    /// - [`ClientError::UnexpectedMessage`] for a client-to-server kind, a
    ///   second `StartGame`, or a move before the game starts or after it
    ///   ends.
    /// - [`ClientError::InvalidColor`] for an unknown colour value.
    /// - [`ClientError::Desync`] if a broadcast move does not fit the local
    ///   board.
    ///
    /// On error the session is left as it was.
    pub fn handle_message(&mut self, msg: Message) -> Result<(), ClientError> {
        let kind = msg.kind();
        match msg {
            Message::StartGame { color } => {
                if self.state != ClientState::WaitingForGame {
                    return Err(ClientError::UnexpectedMessage(kind));
                }
                let color = parse_color(color)?;
                self.color = Some(color);
                // White always opens.
                self.state = match color {
                    Color::White => ClientState::PlacingPiece,
                    Color::Black => ClientState::WaitingForPlayer,
                };
                tracing::info!(%color, "game started");
            }

            Message::MakeMove {
                letter,
                number,
                direction,
                color,
            } => {
                if matches!(
                    self.state,
                    ClientState::WaitingForGame | ClientState::GameOver { .. }
                ) {
                    return Err(ClientError::UnexpectedMessage(kind));
                }
                let color = parse_color(color)?;
                let origin = Coord::from_wire(letter, number).map_err(ClientError::Desync)?;
                let direction = Direction::try_from(direction).map_err(ClientError::Desync)?;

                self.board
                    .place_and_push(origin, direction, color)
                    .map_err(ClientError::Desync)?;
                if let Some(capture) = self.board.resolve_captures(color) {
                    tracing::debug!(removed = capture.removed.len(), "capture replayed");
                }

                self.state = if self.state == ClientState::WaitingForServer {
                    ClientState::WaitingForPlayer
                } else {
                    ClientState::PlacingPiece
                };
                tracing::debug!(%origin, %direction, %color, state = %self.state, "move applied");
            }

            Message::DeclareWinner { winner } => {
                let winner = parse_color(winner)?;
                self.state = ClientState::GameOver { winner };
                tracing::info!(%winner, won = self.has_won(), "game over");
            }

            Message::JoinGame { .. }
            | Message::TryMove { .. }
            | Message::QuitGame
            | Message::Shutdown => return Err(ClientError::UnexpectedMessage(kind)),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Local input
    // -----------------------------------------------------------------------

    /// The player picked `cell` to bring a piece in from.
    ///
    /// Returns the move to send when `cell` has a single entry direction
    /// and the push is legal. A cell with two directions moves to
    /// [`ClientState::ChoosingDirection`] and returns `None`. Outside
    /// [`ClientState::PlacingPiece`] the input is ignored.
    ///
    /// # Errors
    /// [`ClientError::NotAnEntryPoint`] or [`ClientError::IllegalMove`];
    /// the state does not change.
    pub fn select_cell(&mut self, cell: Coord) -> Result<Option<Message>, ClientError> {
        if self.state != ClientState::PlacingPiece {
            tracing::debug!(%cell, state = %self.state, "ignoring cell selection");
            return Ok(None);
        }

        match self.board.entry_directions(cell) {
            [] => Err(ClientError::NotAnEntryPoint(cell)),
            [direction] => self.submit(cell, *direction).map(Some),
            directions => {
                self.state = ClientState::ChoosingDirection { cell, directions };
                Ok(None)
            }
        }
    }

    /// The player picked a push direction for the cell chosen earlier.
    /// Ignored outside [`ClientState::ChoosingDirection`].
    ///
    /// # Errors
    /// [`ClientError::InvalidDirection`] if `direction` was not offered,
    /// [`ClientError::IllegalMove`] if the line is full. The player stays
    /// in `ChoosingDirection` either way.
    pub fn choose_direction(
        &mut self,
        direction: Direction,
    ) -> Result<Option<Message>, ClientError> {
        let ClientState::ChoosingDirection { cell, directions } = self.state else {
            tracing::debug!(%direction, state = %self.state, "ignoring direction choice");
            return Ok(None);
        };
        if !directions.contains(&direction) {
            return Err(ClientError::InvalidDirection(direction));
        }
        self.submit(cell, direction).map(Some)
    }

    /// Backs out of a direction choice.
    pub fn cancel_direction(&mut self) {
        if matches!(self.state, ClientState::ChoosingDirection { .. }) {
            self.state = ClientState::PlacingPiece;
        }
    }

    /// The message to send when the player leaves.
    pub fn quit(&self) -> Message {
        tracing::info!(state = %self.state, "leaving game");
        Message::QuitGame
    }

    fn submit(&mut self, cell: Coord, direction: Direction) -> Result<Message, ClientError> {
        if !self.board.can_place_and_push(cell, direction) {
            tracing::debug!(%cell, %direction, "line is full");
            return Err(ClientError::IllegalMove(cell, direction));
        }
        self.state = ClientState::WaitingForServer;

        let (letter, number) = cell.to_wire();
        Ok(Message::TryMove {
            letter,
            number,
            direction: direction.to_wire(),
        })
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// The local replica of the server's board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Our colour, once the game has started.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// `true` while the local player is expected to pick a move.
    pub fn is_my_turn(&self) -> bool {
        matches!(
            self.state,
            ClientState::PlacingPiece | ClientState::ChoosingDirection { .. }
        )
    }

    pub fn winner(&self) -> Option<Color> {
        match self.state {
            ClientState::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// `true` once the server has declared us the winner.
    pub fn has_won(&self) -> bool {
        self.winner().is_some() && self.winner() == self.color
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_color(value: i8) -> Result<Color, ClientError> {
    Color::try_from(value).map_err(|_| ClientError::InvalidColor(value))
}
