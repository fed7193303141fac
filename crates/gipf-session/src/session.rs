//! The authoritative game session shared by every connection handler.
//!
//! Two locks guard two separate concerns:
//!
//! - the **roster** (seats, colours, lifecycle state, outboxes), touched by
//!   joins, leaves, and start-up;
//! - the **board**, held for a whole move: place, resolve captures, check
//!   for a winner, and broadcast the result. No handler ever sees a
//!   half-applied move, and both players receive moves in the same order.
//!
//! When both locks are needed the board is always taken first.
//!
//! The "second player joined" signal is a `watch` channel that flips from
//! `false` to `true` exactly once.

use gipf_board::{Board, BoardError, Capture, Color, Coord, Direction};
use gipf_protocol::Message;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch, Mutex};

use crate::{PlayerId, SessionConfig, SessionError, SessionState};

/// Seats in a game.
pub const MAX_PLAYERS: usize = 2;

/// Channel for delivering outbound messages to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<Message>;

/// What happened to a submitted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played and `MakeMove` broadcast to both players.
    Applied {
        color: Color,
        capture: Option<Capture>,
    },
    /// The move emptied a reserve; `DeclareWinner` was broadcast and the
    /// session is over.
    Won { winner: Color },
    /// The board refused the move. Nothing was broadcast.
    Rejected(BoardError),
}

struct Seat {
    id: PlayerId,
    name: String,
    color: Option<Color>,
    /// `None` once the session has let go of this player's connection.
    outbox: Option<PlayerSender>,
}

struct Roster {
    state: SessionState,
    seats: Vec<Seat>,
}

impl Roster {
    fn seat(&self, player_id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == player_id)
    }

    fn broadcast(&self, msg: &Message) {
        for seat in &self.seats {
            if let Some(outbox) = &seat.outbox {
                // A closed outbox means that connection is already gone.
                let _ = outbox.send(msg.clone());
            }
        }
    }

    /// Ends the game and drops every outbox, which lets each connection's
    /// writer flush what is queued and then hang up.
    fn finish(&mut self) {
        self.state = SessionState::Finished;
        for seat in &mut self.seats {
            seat.outbox = None;
        }
    }
}

/// One match between two players over one shared board.
pub struct GameSession {
    config: SessionConfig,
    roster: Mutex<Roster>,
    board: Mutex<Board>,
    started: watch::Sender<bool>,
}

impl GameSession {
    /// Creates a session with the standard opening position.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_board(config, Board::new())
    }

    /// Creates a session that starts from `board`.
    pub fn with_board(config: SessionConfig, board: Board) -> Self {
        let (started, _) = watch::channel(false);
        Self {
            config,
            roster: Mutex::new(Roster {
                state: SessionState::WaitingForPlayers,
                seats: Vec::with_capacity(MAX_PLAYERS),
            }),
            board: Mutex::new(board),
            started,
        }
    }

    /// Seats a player. `outbox` receives every message the session sends
    /// to them, starting with `StartGame`.
    ///
    /// The second successful join flips a coin for colours, queues
    /// `StartGame` to both players, and releases every
    /// [`wait_for_start`](Self::wait_for_start) caller.
    ///
    /// # Errors
    /// [`SessionError::SessionFull`] once two players are seated (the
    /// caller should say so and hang up), [`SessionError::AlreadyJoined`]
    /// for a repeated join.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: impl Into<String>,
        outbox: PlayerSender,
    ) -> Result<(), SessionError> {
        let name = name.into();
        let mut roster = self.roster.lock().await;

        if roster.seat(player_id).is_some() {
            return Err(SessionError::AlreadyJoined(player_id));
        }
        if !roster.state.is_joinable() || roster.seats.len() >= MAX_PLAYERS {
            tracing::info!(%player_id, %name, "join refused, game is full");
            return Err(SessionError::SessionFull);
        }

        roster.seats.push(Seat {
            id: player_id,
            name: name.clone(),
            color: None,
            outbox: Some(outbox),
        });
        tracing::info!(
            %player_id,
            %name,
            players = roster.seats.len(),
            "player joined"
        );

        if roster.seats.len() == MAX_PLAYERS {
            self.start(&mut roster);
        }
        Ok(())
    }

    fn start(&self, roster: &mut Roster) {
        let first_is_white = match self.config.color_seed {
            Some(seed) => StdRng::seed_from_u64(seed).random_bool(0.5),
            None => rand::rng().random_bool(0.5),
        };
        let first = if first_is_white {
            Color::White
        } else {
            Color::Black
        };

        roster.seats[0].color = Some(first);
        roster.seats[1].color = Some(first.opponent());
        roster.state = SessionState::Playing;

        for seat in &roster.seats {
            if let (Some(outbox), Some(color)) = (&seat.outbox, seat.color) {
                let _ = outbox.send(Message::StartGame {
                    color: color.to_wire(),
                });
                tracing::info!(player_id = %seat.id, name = %seat.name, %color, "game start");
            }
        }

        self.started.send_replace(true);
    }

    /// Waits until both seats are filled and returns the colour assigned
    /// to `player_id`.
    ///
    /// # Errors
    /// [`SessionError::NotJoined`] if the player holds no seat.
    pub async fn wait_for_start(&self, player_id: PlayerId) -> Result<Color, SessionError> {
        if self.roster.lock().await.seat(player_id).is_none() {
            return Err(SessionError::NotJoined(player_id));
        }

        let mut started = self.started.subscribe();
        // The sender lives as long as `self`, so this only fails if the
        // session is being torn down.
        started
            .wait_for(|s| *s)
            .await
            .map_err(|_| SessionError::Finished)?;

        self.roster
            .lock()
            .await
            .seat(player_id)
            .and_then(|s| s.color)
            .ok_or(SessionError::NotJoined(player_id))
    }

    /// Plays a move for `player_id` using the colour on file for them.
    ///
    /// Whose turn it is is **not** checked here: either player may submit
    /// at any time. Turn order is kept by the clients.
    ///
    /// # Errors
    /// [`SessionError::NotStarted`] before the second player arrives,
    /// [`SessionError::Finished`] after the game is over,
    /// [`SessionError::NotJoined`] for a player without a seat.
    pub async fn apply_move(
        &self,
        player_id: PlayerId,
        letter: i8,
        number: i8,
        direction: i8,
    ) -> Result<MoveOutcome, SessionError> {
        let mut board = self.board.lock().await;

        let color = {
            let roster = self.roster.lock().await;
            match roster.state {
                SessionState::WaitingForPlayers => return Err(SessionError::NotStarted),
                SessionState::Finished => return Err(SessionError::Finished),
                SessionState::Playing => {}
            }
            roster
                .seat(player_id)
                .and_then(|s| s.color)
                .ok_or(SessionError::NotJoined(player_id))?
        };

        let placed = parse_move(letter, number, direction).and_then(|(origin, dir)| {
            board
                .place_and_push(origin, dir, color)
                .map(|()| (origin, dir))
        });
        let (origin, dir) = match placed {
            Ok(m) => m,
            Err(reason) => {
                tracing::warn!(%player_id, %color, %reason, "invalid move");
                return Ok(MoveOutcome::Rejected(reason));
            }
        };

        let capture = board.resolve_captures(color);
        if let Some(c) = &capture {
            tracing::debug!(
                %player_id,
                removed = c.removed.len(),
                returned = c.returned,
                "capture"
            );
        }

        let mut roster = self.roster.lock().await;
        if let Some(winner) = board.check_winner() {
            roster.broadcast(&Message::DeclareWinner {
                winner: winner.to_wire(),
            });
            roster.finish();
            tracing::info!(%winner, "game over");
            return Ok(MoveOutcome::Won { winner });
        }

        let (letter, number) = origin.to_wire();
        roster.broadcast(&Message::MakeMove {
            letter,
            number,
            direction: dir.to_wire(),
            color: color.to_wire(),
        });
        tracing::debug!(%player_id, %color, %origin, direction = %dir, "move applied");
        Ok(MoveOutcome::Applied { color, capture })
    }

    /// Removes a player whose connection ended.
    ///
    /// Before the game starts this frees the seat. During play it ends the
    /// session and releases the other player's connection too.
    pub async fn leave(&self, player_id: PlayerId) {
        let mut roster = self.roster.lock().await;
        let Some(index) = roster.seats.iter().position(|s| s.id == player_id) else {
            return;
        };

        match roster.state {
            SessionState::WaitingForPlayers => {
                let seat = roster.seats.remove(index);
                tracing::info!(%player_id, name = %seat.name, "player left before start");
            }
            SessionState::Playing => {
                tracing::info!(%player_id, "player left, ending game");
                roster.finish();
            }
            SessionState::Finished => {
                roster.seats[index].outbox = None;
            }
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.roster.lock().await.state
    }

    /// Names of seated players, in join order.
    pub async fn player_names(&self) -> Vec<String> {
        self.roster
            .lock()
            .await
            .seats
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    /// A copy of the board as it stands between moves.
    pub async fn board_snapshot(&self) -> Board {
        self.board.lock().await.clone()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

fn parse_move(letter: i8, number: i8, direction: i8) -> Result<(Coord, Direction), BoardError> {
    let origin = Coord::from_wire(letter, number)?;
    let direction = Direction::try_from(direction)?;
    Ok((origin, direction))
}
