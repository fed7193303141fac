//! Integration tests for `ServerConnection` against a scripted server.

use gipf_client::{ClientError, ServerConnection};
use gipf_protocol::{BinaryCodec, Codec, Message, GAME_FULL};
use gipf_transport::{Connection, TcpConnection, TcpTransport, Transport};

async fn listen() -> (TcpTransport, String) {
    let transport = TcpTransport::bind("127.0.0.1:0").await.unwrap();
    let addr = transport.local_addr().unwrap().to_string();
    (transport, addr)
}

async fn pair() -> (ServerConnection, TcpConnection) {
    let (mut transport, addr) = listen().await;
    let (client, server) = tokio::join!(ServerConnection::connect(&addr), transport.accept());
    (client.unwrap(), server.unwrap())
}

#[tokio::test]
async fn test_join_sends_name() {
    let (client, server) = pair().await;
    client.join("alice smith").await.unwrap();

    let data = server.recv().await.unwrap().unwrap();
    assert_eq!(data, b"JGalice smith");
}

#[tokio::test]
async fn test_game_full_denial() {
    let (client, server) = pair().await;
    server.send(GAME_FULL).await.unwrap();
    server.close().await.unwrap();

    assert!(matches!(client.recv().await, Err(ClientError::GameFull)));
}

#[tokio::test]
async fn test_coalesced_messages_are_split() {
    let (client, server) = pair().await;

    let codec = BinaryCodec;
    let start = Message::StartGame { color: 1 };
    let moved = Message::MakeMove {
        letter: 0,
        number: 0,
        direction: 2,
        color: 1,
    };
    let mut bytes = codec.encode(&start).unwrap();
    bytes.extend(codec.encode(&moved).unwrap());
    server.send(&bytes).await.unwrap();

    assert_eq!(client.recv().await.unwrap(), Some(start));
    assert_eq!(client.recv().await.unwrap(), Some(moved));
}

#[tokio::test]
async fn test_server_hangup() {
    let (client, server) = pair().await;
    server
        .send(&BinaryCodec.encode(&Message::DeclareWinner { winner: 2 }).unwrap())
        .await
        .unwrap();
    server.close().await.unwrap();

    assert_eq!(
        client.expect_message().await.unwrap(),
        Message::DeclareWinner { winner: 2 }
    );
    assert!(matches!(
        client.expect_message().await,
        Err(ClientError::Disconnected)
    ));
}

#[tokio::test]
async fn test_garbage_is_a_protocol_error() {
    let (client, server) = pair().await;
    server.send(b"ZZ\x01").await.unwrap();

    assert!(matches!(client.recv().await, Err(ClientError::Protocol(_))));
}

#[tokio::test]
async fn test_quit_sends_message_then_closes() {
    let (client, server) = pair().await;
    client.quit().await.unwrap();

    assert_eq!(server.recv().await.unwrap(), Some(b"QG".to_vec()));
    assert_eq!(server.recv().await.unwrap(), None);
}

#[tokio::test]
async fn test_connect_to_nothing() {
    let (transport, addr) = listen().await;
    drop(transport);

    assert!(matches!(
        ServerConnection::connect(&addr).await,
        Err(ClientError::Transport(_))
    ));
}
