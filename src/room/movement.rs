use super::Room;
use crate::types::*;

impl Room {
    /// Move every participant with held directions by one step.
    /// Returns how many participants moved.
    pub fn advance(&mut self) -> usize {
        let step = self.step;
        let mut moved = 0;

        for participant in self.participants.values_mut() {
            if participant.intent.is_idle() {
                continue;
            }
            let (dx, dy) = Direction::ALL
                .iter()
                .filter(|d| participant.intent.is_held(**d))
                .map(|d| d.delta())
                .fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));

            if dx != 0.0 || dy != 0.0 {
                participant.position.x += dx * step;
                participant.position.y += dy * step;
                moved += 1;
            }
        }

        moved
    }

    /// One broadcast tick: advance positions, then return the full list
    pub fn tick(&mut self) -> Vec<ParticipantView> {
        self.advance();
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_direction_moves_along_its_axis() {
        let cases = [
            (Direction::Up, Position { x: 250.0, y: 240.0 }),
            (Direction::Down, Position { x: 250.0, y: 260.0 }),
            (Direction::Left, Position { x: 240.0, y: 250.0 }),
            (Direction::Right, Position { x: 260.0, y: 250.0 }),
        ];

        for (direction, expected) in cases {
            let mut room = Room::default();
            room.join("a".to_string());
            room.set_intent("a", direction, true);
            assert_eq!(room.advance(), 1);
            assert_eq!(room.get("a").unwrap().position, expected, "{:?}", direction);
        }
    }

    #[test]
    fn test_diagonal_and_opposing() {
        let mut room = Room::default();
        room.join("a".to_string());
        room.set_intent("a", Direction::Up, true);
        room.set_intent("a", Direction::Right, true);
        room.advance();
        assert_eq!(room.get("a").unwrap().position, Position { x: 260.0, y: 240.0 });

        room.set_intent("a", Direction::Left, true);
        room.advance();
        assert_eq!(room.get("a").unwrap().position, Position { x: 260.0, y: 230.0 });

        room.set_intent("a", Direction::Down, true);
        assert_eq!(room.advance(), 0);
        assert_eq!(room.get("a").unwrap().position, Position { x: 260.0, y: 230.0 });
    }

    #[test]
    fn test_tick_on_empty_room() {
        let mut room = Room::default();
        assert!(room.tick().is_empty());
    }
}
