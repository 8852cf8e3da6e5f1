use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

/// Events a client emits. Each frame is `{"t": <event>, "d": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", content = "d", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinChat,
    KeyPress(KeyPress),
    Message(String),
}

/// A single key transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    /// Kept as a raw string so unknown directions can be dropped without
    /// failing the whole frame
    pub input_id: String,
    pub state: bool,
}

impl KeyPress {
    pub fn new(direction: Direction, state: bool) -> Self {
        Self {
            input_id: direction.as_input_id().to_string(),
            state,
        }
    }
}

/// Events the server pushes to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", content = "d", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once per connection, before any broadcast
    Welcome(Welcome),
    NewPositions(Vec<ParticipantView>),
    Message(ChatLine),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub id: ConnectionId,
    pub protocol: String,
    pub server_now: String,
}
