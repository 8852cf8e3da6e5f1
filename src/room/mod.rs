//! The authoritative room
//!
//! `Room` owns every joined participant. It is plain synchronous state: the
//! room task in [`crate::broadcast`] is its only owner, so connection handlers
//! reach it through commands and nothing here needs a lock.

mod chat;
mod input;
mod movement;
mod registry;

use crate::config::RoomConfig;
use crate::types::*;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Room {
    participants: HashMap<ConnectionId, Participant>,
    /// Join order, used to keep broadcasts stable
    order: Vec<ConnectionId>,
    spawn: Position,
    step: f64,
    max_message_chars: usize,
}

impl Room {
    pub fn new(config: &RoomConfig) -> Self {
        Self {
            participants: HashMap::new(),
            order: Vec::new(),
            spawn: config.spawn,
            step: config.step,
            max_message_chars: config.max_message_chars,
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(&RoomConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::KeyPress;

    fn room_with(ids: &[&str]) -> Room {
        let mut room = Room::default();
        for id in ids {
            assert!(room.join(id.to_string()));
        }
        room
    }

    #[test]
    fn test_move_one_leaves_other_in_place() {
        let mut room = room_with(&["a", "b"]);
        room.apply_key_press("a", &KeyPress::new(Direction::Up, true));

        let views = room.tick();
        let a = views.iter().find(|p| p.id == "a").unwrap();
        let b = views.iter().find(|p| p.id == "b").unwrap();
        assert_eq!(a.y, 240.0);
        assert_eq!(a.x, 250.0);
        assert_eq!(b.y, 250.0);
        assert_eq!(b.x, 250.0);
    }

    #[test]
    fn test_held_key_moves_monotonically_until_released() {
        let mut room = room_with(&["a"]);
        room.apply_key_press("a", &KeyPress::new(Direction::Right, true));

        let mut last_x = room.get("a").unwrap().position.x;
        for _ in 0..5 {
            room.tick();
            let x = room.get("a").unwrap().position.x;
            assert!(x > last_x);
            last_x = x;
        }
        assert_eq!(last_x, 300.0);

        room.apply_key_press("a", &KeyPress::new(Direction::Right, false));
        room.tick();
        room.tick();
        assert_eq!(room.get("a").unwrap().position.x, 300.0);
    }

    #[test]
    fn test_chat_then_leave_clears_bubble() {
        let mut room = room_with(&["a", "b"]);
        let line = room.chat("a", "hello").unwrap();
        assert_eq!(line.sender_id, "a");

        let views = room.tick();
        assert!(views.iter().any(|p| p.id == "a" && p.sent_message));

        room.leave("a");
        let views = room.tick();
        assert_eq!(views.len(), 1);
        assert!(views.iter().all(|p| p.id != "a"));
    }

    #[test]
    fn test_custom_config_applies() {
        let config = RoomConfig {
            step: 3.0,
            spawn: Position { x: 0.0, y: 0.0 },
            ..RoomConfig::default()
        };
        let mut room = Room::new(&config);
        room.join("a".to_string());
        room.apply_key_press("a", &KeyPress::new(Direction::Down, true));
        room.tick();
        assert_eq!(room.get("a").unwrap().position, Position { x: 0.0, y: 3.0 });
    }
}
