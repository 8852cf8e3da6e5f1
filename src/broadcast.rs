use crate::protocol::ServerMessage;
use crate::room::Room;
use crate::state::RoomCommand;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the task that owns the room.
///
/// Commands and broadcast ticks are handled one at a time on this task, so
/// the room is never touched concurrently. The task ends once every command
/// sender is dropped.
pub fn spawn_room(
    mut room: Room,
    mut commands: mpsc::Receiver<RoomCommand>,
    tx: broadcast::Sender<ServerMessage>,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => apply_command(&mut room, command, &tx),
                        None => break,
                    }
                }

                _ = ticker.tick() => {
                    let positions = room.tick();
                    // Ignore send errors (no receivers connected is fine)
                    let _ = tx.send(ServerMessage::NewPositions(positions));
                }
            }
        }

        tracing::info!("Room task stopped");
    })
}

/// Apply a single command to the room, relaying chat as it arrives
pub fn apply_command(room: &mut Room, command: RoomCommand, tx: &broadcast::Sender<ServerMessage>) {
    match command {
        RoomCommand::Join { id } => {
            if room.join(id.clone()) {
                tracing::info!("Participant {} joined ({} in room)", id, room.len());
            } else {
                tracing::debug!("Participant {} already joined", id);
            }
        }

        RoomCommand::Leave { id } => {
            if room.leave(&id) {
                tracing::info!("Participant {} left ({} in room)", id, room.len());
            }
        }

        RoomCommand::KeyPress { id, press } => {
            room.apply_key_press(&id, &press);
        }

        RoomCommand::Chat { id, text } => match room.chat(&id, &text) {
            Some(line) => {
                tracing::debug!("Chat from {}: {}", id, line.text);
                let _ = tx.send(ServerMessage::Message(line));
            }
            None => tracing::debug!("Dropped chat from {}", id),
        },

        RoomCommand::Snapshot { reply } => {
            let _ = reply.send(room.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::KeyPress;
    use crate::types::Direction;

    #[test]
    fn test_apply_commands_in_order() {
        let mut room = Room::default();
        let (tx, mut rx) = broadcast::channel(8);

        apply_command(&mut room, RoomCommand::Join { id: "a".to_string() }, &tx);
        apply_command(
            &mut room,
            RoomCommand::KeyPress {
                id: "a".to_string(),
                press: KeyPress::new(Direction::Left, true),
            },
            &tx,
        );
        apply_command(
            &mut room,
            RoomCommand::Chat {
                id: "a".to_string(),
                text: "hi".to_string(),
            },
            &tx,
        );

        assert!(room.get("a").unwrap().intent.left);
        match rx.try_recv().unwrap() {
            ServerMessage::Message(line) => assert_eq!(line.text, "hi"),
            other => panic!("Expected Message, got {:?}", other),
        }

        apply_command(&mut room, RoomCommand::Leave { id: "a".to_string() }, &tx);
        assert!(room.is_empty());
    }

    #[test]
    fn test_dropped_chat_not_relayed() {
        let mut room = Room::default();
        let (tx, mut rx) = broadcast::channel(8);

        apply_command(
            &mut room,
            RoomCommand::Chat {
                id: "ghost".to_string(),
                text: "boo".to_string(),
            },
            &tx,
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tick_broadcasts_positions() {
        let (_commands, commands_rx) = mpsc::channel(8);
        let (tx, mut rx) = broadcast::channel(8);
        let mut room = Room::default();
        room.join("a".to_string());

        let handle = spawn_room(room, commands_rx, tx, Duration::from_millis(5));

        match rx.recv().await.unwrap() {
            ServerMessage::NewPositions(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].id, "a");
            }
            other => panic!("Expected NewPositions, got {:?}", other),
        }
        handle.abort();
    }
}
