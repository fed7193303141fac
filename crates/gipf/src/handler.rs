//! Per-connection handler: join, relay moves, leave.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. Once the player is seated a second task, the
//! writer, drains their outbox into the socket. The flow is:
//!   1. Receive `JoinGame` → take a seat or be told `GF`
//!   2. Keep reading; `StartGame` reaches the player through the writer
//!      once a second player arrives
//!   3. Receive `TryMove` → apply it to the shared session
//!   4. On `QuitGame`, `Shutdown`, EOF, or garbage → leave the session
//!
//! The read loop never parks on the start signal, so a player who hangs up
//! while waiting for an opponent gives their seat back straight away.

use std::sync::Arc;

use gipf_protocol::{Codec, Message, GAME_FULL};
use gipf_session::{MoveOutcome, PlayerId, SessionError};
use gipf_transport::{Connection, TcpConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::GipfError;

/// Takes the player out of the session when the handler exits, even if it
/// panics. `Drop` is synchronous, so the leave runs on a spawned task.
struct SeatGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SeatGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.session.leave(player_id).await;
        });
    }
}

enum Flow {
    Continue,
    Done,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: TcpConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GipfError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    let mut seat = None;
    let result = read_loop(&conn, &state, player_id, &mut seat).await;

    // A seated player's socket is closed by its writer once the session
    // lets go of the outbox; anyone else is closed here.
    if seat.is_none() {
        let _ = conn.close().await;
    }
    result
}

async fn read_loop<C: Codec>(
    conn: &Arc<TcpConnection>,
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    seat: &mut Option<SeatGuard<C>>,
) -> Result<(), GipfError> {
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                return Err(e.into());
            }
        };

        let messages = match state.codec.decode_all(&data) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "corrupt message, dropping connection");
                return Err(e.into());
            }
        };

        for msg in messages {
            if let Flow::Done = dispatch(conn, state, player_id, seat, msg).await? {
                return Ok(());
            }
        }
    }
}

async fn dispatch<C: Codec>(
    conn: &Arc<TcpConnection>,
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    seat: &mut Option<SeatGuard<C>>,
    msg: Message,
) -> Result<Flow, GipfError> {
    let kind = msg.kind();
    match msg {
        Message::JoinGame { player_name } => {
            if seat.is_some() {
                tracing::debug!(%player_id, "ignoring repeated join");
                return Ok(Flow::Continue);
            }

            let (outbox, inbox) = mpsc::unbounded_channel();
            match state.session.join(player_id, player_name, outbox).await {
                Ok(()) => {}
                Err(SessionError::SessionFull) => {
                    conn.send(GAME_FULL).await?;
                    return Ok(Flow::Done);
                }
                Err(e) => return Err(e.into()),
            }
            *seat = Some(SeatGuard {
                player_id,
                state: Arc::clone(state),
            });
            spawn_writer(Arc::clone(conn), Arc::clone(state), player_id, inbox);
            tracing::debug!(%player_id, "seated");
        }

        Message::TryMove {
            letter,
            number,
            direction,
        } => match state
            .session
            .apply_move(player_id, letter, number, direction)
            .await
        {
            Ok(MoveOutcome::Applied { color, capture }) => {
                tracing::debug!(
                    %player_id,
                    %color,
                    captured = capture.is_some(),
                    "move relayed"
                );
            }
            Ok(MoveOutcome::Won { winner }) => {
                tracing::info!(%player_id, %winner, "winning move");
            }
            // Already logged by the session; the sender is not told.
            Ok(MoveOutcome::Rejected(_)) => {}
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "move refused");
            }
        },

        Message::QuitGame => {
            tracing::info!(%player_id, "player quit");
            return Ok(Flow::Done);
        }

        Message::Shutdown => {
            tracing::info!(%player_id, "client shut down");
            return Ok(Flow::Done);
        }

        Message::StartGame { .. } | Message::MakeMove { .. } | Message::DeclareWinner { .. } => {
            tracing::warn!(
                %player_id,
                %kind,
                "server-only message from client, dropping connection"
            );
            return Err(GipfError::UnexpectedMessage(kind));
        }
    }
    Ok(Flow::Continue)
}

/// Forwards everything the session queues for this player to the socket,
/// then hangs up once the session drops the outbox.
fn spawn_writer<C: Codec>(
    conn: Arc<TcpConnection>,
    state: Arc<ServerState<C>>,
    player_id: PlayerId,
    mut inbox: mpsc::UnboundedReceiver<Message>,
) {
    tokio::spawn(async move {
        while let Some(msg) = inbox.recv().await {
            let bytes = match state.codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "encode failed");
                    continue;
                }
            };
            if let Err(e) = conn.send(&bytes).await {
                tracing::debug!(%player_id, error = %e, "send failed");
                break;
            }
        }
        let _ = conn.close().await;
        tracing::debug!(%player_id, "writer finished");
    });
}
