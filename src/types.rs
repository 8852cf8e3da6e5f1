use serde::{Deserialize, Serialize};

/// Opaque per-connection identifier (a ULID string)
pub type ConnectionId = String;

/// A held movement direction.
///
/// The wire form is the capitalized name (`"Up"`, `"Down"`, ...), which is
/// also what clients send as `inputId`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Map a wire `inputId` to a direction. Unknown ids yield `None`.
    pub fn from_input_id(input_id: &str) -> Option<Self> {
        match input_id {
            "Up" => Some(Direction::Up),
            "Down" => Some(Direction::Down),
            "Left" => Some(Direction::Left),
            "Right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_input_id(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }

    /// Unit vector in screen coordinates (y grows downwards)
    pub fn delta(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Which directions a participant currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    pub fn set(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Up => self.up = active,
            Direction::Down => self.down = active,
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Server-side record of one joined connection
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ConnectionId,
    pub position: Position,
    pub intent: MovementIntent,
    /// True once the participant has said something; drives bubble rendering
    pub sent_message: bool,
    pub current_message: String,
}

impl Participant {
    pub fn new(id: ConnectionId, position: Position) -> Self {
        Self {
            id,
            position,
            intent: MovementIntent::default(),
            sent_message: false,
            current_message: String::new(),
        }
    }

    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            id: self.id.clone(),
            x: self.position.x,
            y: self.position.y,
            sent_message: self.sent_message,
            current_message: self.current_message.clone(),
        }
    }
}

/// Broadcast shape of a participant. Movement intent stays server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub id: ConnectionId,
    pub x: f64,
    pub y: f64,
    pub sent_message: bool,
    pub current_message: String,
}

/// A relayed chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatLine {
    pub sender_id: ConnectionId,
    pub text: String,
}
