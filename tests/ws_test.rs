//! End-to-end tests over a real socket

use futures::{SinkExt, StreamExt};
use plaza::config::RoomConfig;
use plaza::protocol::{ClientMessage, KeyPress, ServerMessage};
use plaza::server;
use plaza::state::AppState;
use plaza::types::{ConnectionId, Direction};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let state = AppState::start(RoomConfig {
        tick: Duration::from_millis(10),
        ..RoomConfig::default()
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::app(state)).await.unwrap();
    });
    addr
}

/// Connect and return the client with the id from its welcome frame
async fn connect(addr: SocketAddr) -> (Client, ConnectionId) {
    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    match next_message(&mut ws).await {
        ServerMessage::Welcome(welcome) => {
            assert_eq!(welcome.protocol, "1.0");
            (ws, welcome.id)
        }
        other => panic!("Expected Welcome first, got {:?}", other),
    }
}

async fn send(ws: &mut Client, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(Message::Text(json.into())).await.unwrap();
}

async fn next_message(ws: &mut Client) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn wait_for<T, F>(ws: &mut Client, mut pick: F) -> T
where
    F: FnMut(ServerMessage) -> Option<T>,
{
    loop {
        if let Some(found) = pick(next_message(ws).await) {
            return found;
        }
    }
}

#[tokio::test]
async fn test_join_move_chat_leave_over_websocket() {
    let addr = start_server().await;
    let (mut ws_a, id_a) = connect(addr).await;
    let (mut ws_b, id_b) = connect(addr).await;
    assert_ne!(id_a, id_b);

    send(&mut ws_a, &ClientMessage::JoinChat).await;
    send(&mut ws_b, &ClientMessage::JoinChat).await;

    // Both see both
    for ws in [&mut ws_a, &mut ws_b] {
        wait_for(ws, |msg| match msg {
            ServerMessage::NewPositions(list) if list.len() == 2 => Some(()),
            _ => None,
        })
        .await;
    }

    // A walks left; B sees it and stays put
    send(
        &mut ws_a,
        &ClientMessage::KeyPress(KeyPress::new(Direction::Left, true)),
    )
    .await;
    let (ax, bx) = wait_for(&mut ws_b, |msg| match msg {
        ServerMessage::NewPositions(list) => {
            let a = list.iter().find(|p| p.id == id_a)?;
            let b = list.iter().find(|p| p.id == id_b)?;
            (a.x < 250.0).then_some((a.x, b.x))
        }
        _ => None,
    })
    .await;
    assert!(ax < 250.0);
    assert_eq!(bx, 250.0);

    // Chat goes to everyone, sender included
    send(&mut ws_a, &ClientMessage::Message("hello".to_string())).await;
    for ws in [&mut ws_a, &mut ws_b] {
        let line = wait_for(ws, |msg| match msg {
            ServerMessage::Message(line) => Some(line),
            _ => None,
        })
        .await;
        assert_eq!(line.sender_id, id_a);
        assert_eq!(line.text, "hello");
    }

    // A disconnects; B stops seeing A
    ws_a.close(None).await.unwrap();
    wait_for(&mut ws_b, |msg| match msg {
        ServerMessage::NewPositions(list) if list.iter().all(|p| p.id != id_a) => Some(()),
        _ => None,
    })
    .await;
}

#[tokio::test]
async fn test_malformed_frames_do_not_drop_connection() {
    let addr = start_server().await;
    let (mut ws, id) = connect(addr).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    ws.send(Message::Text(r#"{"t":"teleport","d":{"x":1}}"#.into()))
        .await
        .unwrap();
    ws.send(Message::Text(r#"{"t":"message","d":42}"#.into()))
        .await
        .unwrap();

    send(&mut ws, &ClientMessage::JoinChat).await;
    send(&mut ws, &ClientMessage::Message("still here".to_string())).await;

    let line = wait_for(&mut ws, |msg| match msg {
        ServerMessage::Message(line) => Some(line),
        _ => None,
    })
    .await;
    assert_eq!(line.sender_id, id);
    assert_eq!(line.text, "still here");
}
