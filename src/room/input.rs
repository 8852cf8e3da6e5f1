use super::Room;
use crate::protocol::KeyPress;
use crate::types::*;

impl Room {
    /// Apply a key transition from the wire. Unknown directions and unknown
    /// connections are ignored; returns whether any intent changed.
    pub fn apply_key_press(&mut self, id: &str, press: &KeyPress) -> bool {
        match Direction::from_input_id(&press.input_id) {
            Some(direction) => self.set_intent(id, direction, press.state),
            None => {
                tracing::debug!("Ignoring unknown inputId {:?} from {}", press.input_id, id);
                false
            }
        }
    }

    pub fn set_intent(&mut self, id: &str, direction: Direction, active: bool) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                let changed = participant.intent.is_held(direction) != active;
                participant.intent.set(direction, active);
                changed
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_toggles_intent() {
        let mut room = Room::default();
        room.join("a".to_string());

        assert!(room.apply_key_press("a", &KeyPress::new(Direction::Up, true)));
        assert!(room.get("a").unwrap().intent.up);

        // Autorepeat of the same state changes nothing
        assert!(!room.apply_key_press("a", &KeyPress::new(Direction::Up, true)));

        assert!(room.apply_key_press("a", &KeyPress::new(Direction::Up, false)));
        assert!(room.get("a").unwrap().intent.is_idle());
    }

    #[test]
    fn test_unknown_direction_ignored() {
        let mut room = Room::default();
        room.join("a".to_string());

        let press = KeyPress {
            input_id: "Jump".to_string(),
            state: true,
        };
        assert!(!room.apply_key_press("a", &press));
        assert!(room.get("a").unwrap().intent.is_idle());
    }

    #[test]
    fn test_unknown_connection_ignored() {
        let mut room = Room::default();
        assert!(!room.apply_key_press("ghost", &KeyPress::new(Direction::Left, true)));
        assert!(room.is_empty());
    }
}
