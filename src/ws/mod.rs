pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::protocol::{ClientMessage, ServerMessage, Welcome, PROTOCOL_VERSION};
use crate::state::AppState;
use crate::types::ConnectionId;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let id: ConnectionId = ulid::Ulid::new().to_string();

    tracing::info!("WebSocket connected: {}", id);

    // Subscribe before the welcome so no broadcast slips between them
    let mut broadcast_rx = state.subscribe();

    let welcome = ServerMessage::Welcome(Welcome {
        id: id.clone(),
        protocol: PROTOCOL_VERSION.to_string(),
        server_now: chrono::Utc::now().to_rfc3339(),
    });

    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message to {}", id);
            return;
        }
    }

    loop {
        tokio::select! {
            broadcast_msg = broadcast_rx.recv() => {
                match broadcast_msg {
                    Ok(msg) => {
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    // Positions are full snapshots, so skipped frames are harmless
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Connection {} lagged, skipped {} frames", id, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message from {}: {}", id, text.as_str());

                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(client_msg) => {
                                if let Err(e) = handlers::handle_message(client_msg, &id, &state).await {
                                    tracing::error!("Dropping connection {}: {}", id, e);
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!("Ignoring malformed message from {}: {}", id, e);
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed by {}", id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket error on {}: {}", id, e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    if let Err(e) = state.leave(&id).await {
        tracing::debug!("Could not remove {} from room: {}", id, e);
    }

    tracing::info!("WebSocket connection closed: {}", id);
}
