use crate::config::RoomConfig;
use crate::protocol::{KeyPress, ServerMessage};
use crate::room::Room;
use crate::types::*;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Requests from connection tasks to the room task
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        id: ConnectionId,
    },
    Leave {
        id: ConnectionId,
    },
    KeyPress {
        id: ConnectionId,
        press: KeyPress,
    },
    Chat {
        id: ConnectionId,
        text: String,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<ParticipantView>>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("room task is no longer running")]
    Closed,
}

impl<T> From<mpsc::error::SendError<T>> for RoomError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        RoomError::Closed
    }
}

impl From<oneshot::error::RecvError> for RoomError {
    fn from(_: oneshot::error::RecvError) -> Self {
        RoomError::Closed
    }
}

/// Shared application state.
///
/// Cloning is cheap; every clone talks to the same room task.
#[derive(Clone)]
pub struct AppState {
    commands: mpsc::Sender<RoomCommand>,
    /// Fan-out channel for everything the room pushes to clients
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// Create the room and spawn the task that owns it.
    /// Must be called from within a tokio runtime.
    pub fn start(config: RoomConfig) -> Self {
        let (commands, commands_rx) = mpsc::channel(config.command_capacity);
        let (broadcast, _rx) = broadcast::channel(config.broadcast_capacity);

        crate::broadcast::spawn_room(
            Room::new(&config),
            commands_rx,
            broadcast.clone(),
            config.tick,
        );

        Self {
            commands,
            broadcast,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcast.subscribe()
    }

    pub async fn join(&self, id: &ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Join { id: id.clone() }).await
    }

    pub async fn leave(&self, id: &ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave { id: id.clone() }).await
    }

    pub async fn key_press(&self, id: &ConnectionId, press: KeyPress) -> Result<(), RoomError> {
        self.send(RoomCommand::KeyPress {
            id: id.clone(),
            press,
        })
        .await
    }

    pub async fn chat(&self, id: &ConnectionId, text: String) -> Result<(), RoomError> {
        self.send(RoomCommand::Chat {
            id: id.clone(),
            text,
        })
        .await
    }

    /// Current participant list, ordered after every command sent before it
    pub async fn snapshot(&self) -> Result<Vec<ParticipantView>, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Snapshot { reply }).await?;
        Ok(rx.await?)
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.commands.send(command).await?;
        Ok(())
    }
}
