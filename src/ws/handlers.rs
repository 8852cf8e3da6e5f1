//! WebSocket message dispatch
//!
//! Each client event becomes one room command. Nothing is answered directly:
//! every effect reaches clients through the room's broadcast.

use crate::protocol::ClientMessage;
use crate::state::{AppState, RoomError};
use crate::types::ConnectionId;

/// Forward a parsed client message from connection `id` to the room.
///
/// Only fails when the room task is gone.
pub async fn handle_message(
    msg: ClientMessage,
    id: &ConnectionId,
    state: &AppState,
) -> Result<(), RoomError> {
    match msg {
        ClientMessage::JoinChat => {
            tracing::info!("Join request from {}", id);
            state.join(id).await
        }

        ClientMessage::KeyPress(press) => {
            tracing::debug!("Key {} -> {} from {}", press.input_id, press.state, id);
            state.key_press(id, press).await
        }

        ClientMessage::Message(text) => state.chat(id, text).await,
    }
}
