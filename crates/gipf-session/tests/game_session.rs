//! Integration tests for the game session: seating, start signal, moves,
//! broadcasts, and the end of a game.

use std::sync::Arc;
use std::time::Duration;

use gipf_board::{Board, BoardError, Color, Coord};
use gipf_protocol::Message;
use gipf_session::{
    GameSession, MoveOutcome, PlayerId, PlayerSender, SessionConfig, SessionError, SessionState,
};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

// =========================================================================
// Helpers
// =========================================================================

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const CAROL: PlayerId = PlayerId(3);

fn outbox() -> (PlayerSender, UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

struct Seated {
    alice_rx: UnboundedReceiver<Message>,
    bob_rx: UnboundedReceiver<Message>,
    alice: Color,
    bob: Color,
}

/// Seats Alice then Bob and drains their `StartGame` messages.
async fn seat_both(session: &GameSession) -> Seated {
    let (alice_tx, mut alice_rx) = outbox();
    let (bob_tx, mut bob_rx) = outbox();
    session.join(ALICE, "alice", alice_tx).await.unwrap();
    session.join(BOB, "bob", bob_tx).await.unwrap();

    let alice = session.wait_for_start(ALICE).await.unwrap();
    let bob = session.wait_for_start(BOB).await.unwrap();

    assert_eq!(
        alice_rx.recv().await,
        Some(Message::StartGame {
            color: alice.to_wire()
        })
    );
    assert_eq!(
        bob_rx.recv().await,
        Some(Message::StartGame {
            color: bob.to_wire()
        })
    );

    Seated {
        alice_rx,
        bob_rx,
        alice,
        bob,
    }
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test]
async fn test_two_joins_get_complementary_colors() {
    let session = GameSession::default();
    let seated = seat_both(&session).await;

    assert_eq!(seated.alice.opponent(), seated.bob);
    assert_eq!(session.state().await, SessionState::Playing);
    assert_eq!(session.player_names().await, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_third_join_is_refused() {
    let session = GameSession::default();
    let _seated = seat_both(&session).await;

    let (carol_tx, mut carol_rx) = outbox();
    let result = session.join(CAROL, "carol", carol_tx).await;
    assert_eq!(result, Err(SessionError::SessionFull));

    // The refused sender was dropped, nothing was queued.
    assert_eq!(carol_rx.recv().await, None);
}

#[tokio::test]
async fn test_duplicate_join_is_refused() {
    let session = GameSession::default();
    let (tx, _rx) = outbox();
    session.join(ALICE, "alice", tx.clone()).await.unwrap();

    let result = session.join(ALICE, "alice again", tx).await;
    assert_eq!(result, Err(SessionError::AlreadyJoined(ALICE)));
    assert_eq!(session.state().await, SessionState::WaitingForPlayers);
}

#[tokio::test]
async fn test_wait_for_start_blocks_until_second_player() {
    let session = Arc::new(GameSession::default());
    let (alice_tx, _alice_rx) = outbox();
    session.join(ALICE, "alice", alice_tx).await.unwrap();

    let waiter = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.wait_for_start(ALICE).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished(), "must wait for a second player");

    let (bob_tx, _bob_rx) = outbox();
    session.join(BOB, "bob", bob_tx).await.unwrap();

    let alice = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should be released")
        .unwrap()
        .unwrap();
    let bob = session.wait_for_start(BOB).await.unwrap();
    assert_eq!(alice.opponent(), bob);
}

#[tokio::test]
async fn test_wait_for_start_unknown_player() {
    let session = GameSession::default();
    assert_eq!(
        session.wait_for_start(CAROL).await,
        Err(SessionError::NotJoined(CAROL))
    );
}

#[tokio::test]
async fn test_seeded_coin_flip_is_reproducible() {
    let config = SessionConfig {
        color_seed: Some(7),
    };
    let first = GameSession::new(config.clone());
    let second = GameSession::new(config);

    let a = seat_both(&first).await;
    let b = seat_both(&second).await;
    assert_eq!(a.alice, b.alice);
}

#[tokio::test]
async fn test_leaving_before_start_frees_the_seat() {
    let session = GameSession::default();
    let (alice_tx, _alice_rx) = outbox();
    session.join(ALICE, "alice", alice_tx).await.unwrap();
    session.leave(ALICE).await;

    let (bob_tx, _bob_rx) = outbox();
    let (carol_tx, _carol_rx) = outbox();
    session.join(BOB, "bob", bob_tx).await.unwrap();
    session.join(CAROL, "carol", carol_tx).await.unwrap();

    assert_eq!(session.state().await, SessionState::Playing);
    assert_eq!(session.player_names().await, vec!["bob", "carol"]);
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test]
async fn test_move_before_start_is_an_error() {
    let session = GameSession::default();
    let (tx, _rx) = outbox();
    session.join(ALICE, "alice", tx).await.unwrap();

    let result = session.apply_move(ALICE, 0, 0, 2).await;
    assert_eq!(result, Err(SessionError::NotStarted));
}

#[tokio::test]
async fn test_move_is_broadcast_to_both_players() {
    let session = GameSession::default();
    let mut seated = seat_both(&session).await;

    let outcome = session.apply_move(ALICE, 0, 0, 2).await.unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Applied { color, capture: None } if color == seated.alice
    ));

    let expected = Message::MakeMove {
        letter: 0,
        number: 0,
        direction: 2,
        color: seated.alice.to_wire(),
    };
    assert_eq!(seated.alice_rx.recv().await, Some(expected.clone()));
    assert_eq!(seated.bob_rx.recv().await, Some(expected));

    let board = session.board_snapshot().await;
    assert_eq!(board.get(Coord::new(1, 1).unwrap()), Some(seated.alice));
    assert_eq!(board.get(Coord::new(2, 2).unwrap()), Some(Color::Black));
    assert_eq!(board.reserve(seated.alice), 14);
}

#[tokio::test]
async fn test_illegal_move_is_rejected_silently() {
    let session = GameSession::default();
    let mut seated = seat_both(&session).await;
    let before = session.board_snapshot().await;

    // (4,4) is the centre of the board, not an entry point.
    let outcome = session.apply_move(BOB, 4, 4, 1).await.unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Rejected(BoardError::NotAnEntryPoint(_))
    ));

    assert_eq!(seated.alice_rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(seated.bob_rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(session.board_snapshot().await, before);
}

#[tokio::test]
async fn test_malformed_coordinates_are_rejected() {
    let session = GameSession::default();
    let _seated = seat_both(&session).await;

    let outcome = session.apply_move(ALICE, -1, 0, 2).await.unwrap();
    assert!(matches!(
        outcome,
        MoveOutcome::Rejected(BoardError::InvalidCoordinate { .. })
    ));
    let outcome = session.apply_move(ALICE, 0, 0, 9).await.unwrap();
    assert_eq!(outcome, MoveOutcome::Rejected(BoardError::InvalidDirection(9)));
}

#[tokio::test]
async fn test_turn_order_is_not_enforced() {
    let session = GameSession::default();
    let mut seated = seat_both(&session).await;

    for _ in 0..2 {
        let outcome = session.apply_move(BOB, 4, 0, 1).await.unwrap();
        assert!(matches!(outcome, MoveOutcome::Applied { .. }));
    }
    assert_eq!(session.board_snapshot().await.reserve(seated.bob), 13);

    for _ in 0..2 {
        assert!(matches!(
            seated.alice_rx.recv().await,
            Some(Message::MakeMove { color, .. }) if color == seated.bob.to_wire()
        ));
    }
}

#[tokio::test]
async fn test_move_from_stranger_is_an_error() {
    let session = GameSession::default();
    let _seated = seat_both(&session).await;

    let result = session.apply_move(CAROL, 0, 0, 2).await;
    assert_eq!(result, Err(SessionError::NotJoined(CAROL)));
}

// =========================================================================
// End of game
// =========================================================================

#[tokio::test]
async fn test_emptying_a_reserve_declares_winner_and_ends_session() {
    let session = GameSession::with_board(SessionConfig::default(), Board::with_layout(&[], 1, 1));
    let mut seated = seat_both(&session).await;

    let outcome = session.apply_move(ALICE, 0, 0, 2).await.unwrap();
    let winner = seated.bob;
    assert_eq!(outcome, MoveOutcome::Won { winner });

    let declared = Some(Message::DeclareWinner {
        winner: winner.to_wire(),
    });
    assert_eq!(seated.alice_rx.recv().await, declared);
    assert_eq!(seated.bob_rx.recv().await, declared);

    // Outboxes are released after the declaration.
    assert_eq!(seated.alice_rx.recv().await, None);
    assert_eq!(seated.bob_rx.recv().await, None);

    assert_eq!(session.state().await, SessionState::Finished);
    assert_eq!(
        session.apply_move(BOB, 0, 0, 2).await,
        Err(SessionError::Finished)
    );
}

#[tokio::test]
async fn test_leaving_mid_game_ends_session_for_both() {
    let session = GameSession::default();
    let mut seated = seat_both(&session).await;

    session.leave(ALICE).await;

    assert_eq!(session.state().await, SessionState::Finished);
    assert_eq!(seated.bob_rx.recv().await, None);
    assert_eq!(seated.alice_rx.recv().await, None);
    assert_eq!(
        session.apply_move(BOB, 0, 0, 2).await,
        Err(SessionError::Finished)
    );
}

#[tokio::test]
async fn test_concurrent_moves_arrive_in_the_same_order_for_both() {
    let session = Arc::new(GameSession::default());
    let mut seated = seat_both(&session).await;

    let mut tasks = Vec::new();
    for (player, letter, number, direction) in [
        (ALICE, 4, 0, 1),
        (BOB, 0, 0, 2),
        (ALICE, 8, 0, 6),
        (BOB, 4, 8, 4),
    ] {
        let session = Arc::clone(&session);
        tasks.push(tokio::spawn(async move {
            session.apply_move(player, letter, number, direction).await
        }));
    }
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, MoveOutcome::Applied { .. }));
    }

    let mut seen_by_alice = Vec::new();
    let mut seen_by_bob = Vec::new();
    for _ in 0..4 {
        seen_by_alice.push(seated.alice_rx.recv().await.unwrap());
        seen_by_bob.push(seated.bob_rx.recv().await.unwrap());
    }
    assert_eq!(seen_by_alice, seen_by_bob);
}
