use crate::protocol::KeyPress;
use crate::types::Direction;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Key names (DOM `KeyboardEvent.key` style) that steer the avatar
const DEFAULT_BINDINGS: &[(&str, Direction)] = &[
    ("ArrowUp", Direction::Up),
    ("w", Direction::Up),
    ("ArrowDown", Direction::Down),
    ("s", Direction::Down),
    ("ArrowLeft", Direction::Left),
    ("a", Direction::Left),
    ("ArrowRight", Direction::Right),
    ("d", Direction::Right),
];

/// Lookup table from local key names to directions
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<String, Direction>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(key, direction)| (key.to_string(), *direction))
                .collect(),
        }
    }
}

impl KeyMap {
    pub fn direction(&self, key: &str) -> Option<Direction> {
        self.bindings.get(key).copied()
    }
}

/// Hold window for terminals that only report presses.
/// Must exceed the autorepeat delay (X11 defaults to 660 ms) or held keys stutter.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(700);

/// Hold window from `PLAZA_HOLD_MS`, falling back to [`DEFAULT_HOLD`]
pub fn hold_from_lookup<F>(lookup: F) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("PLAZA_HOLD_MS").map(|raw| raw.trim().parse::<u64>()) {
        Some(Ok(ms)) if ms > 0 => Duration::from_millis(ms),
        Some(_) => {
            tracing::warn!("PLAZA_HOLD_MS must be a positive integer, using default");
            DEFAULT_HOLD
        }
        None => DEFAULT_HOLD,
    }
}

/// Turns a stream of key presses into press/release transitions.
///
/// Most terminals never report key release, only autorepeated presses, so a
/// direction counts as released once no press has arrived for `hold`.
/// Explicit releases (where the terminal supports them) apply immediately.
#[derive(Debug, Clone)]
pub struct HeldKeys {
    hold: Duration,
    held: HashMap<Direction, Instant>,
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD)
    }
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            held: HashMap::new(),
        }
    }

    /// Returns the transition to send, or `None` for autorepeat
    pub fn press(&mut self, direction: Direction, now: Instant) -> Option<KeyPress> {
        match self.held.insert(direction, now) {
            Some(_) => None,
            None => Some(KeyPress::new(direction, true)),
        }
    }

    pub fn release(&mut self, direction: Direction) -> Option<KeyPress> {
        self.held
            .remove(&direction)
            .map(|_| KeyPress::new(direction, false))
    }

    /// Release every direction whose last press is older than the hold window
    pub fn expire(&mut self, now: Instant) -> Vec<KeyPress> {
        let hold = self.hold;
        let stale: Vec<Direction> = self
            .held
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) >= hold)
            .map(|(direction, _)| *direction)
            .collect();

        stale
            .into_iter()
            .filter_map(|direction| self.release(direction))
            .collect()
    }

    pub fn release_all(&mut self) -> Vec<KeyPress> {
        self.held
            .drain()
            .map(|(direction, _)| KeyPress::new(direction, false))
            .collect()
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.contains_key(&direction)
    }
}
