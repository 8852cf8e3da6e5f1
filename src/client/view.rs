use super::keymap::{HeldKeys, KeyMap};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::types::*;
use std::collections::VecDeque;
use std::time::Instant;

pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Everything a client knows about the room, rebuilt from broadcasts.
///
/// Methods that react to local input return the messages to send; the caller
/// owns the socket.
#[derive(Debug)]
pub struct ClientView {
    self_id: Option<ConnectionId>,
    participants: Vec<ParticipantView>,
    log: VecDeque<ChatLine>,
    log_capacity: usize,
    compose: String,
    composing: bool,
    keymap: KeyMap,
    held: HeldKeys,
}

impl Default for ClientView {
    fn default() -> Self {
        Self::new(KeyMap::default(), HeldKeys::default(), DEFAULT_LOG_CAPACITY)
    }
}

impl ClientView {
    pub fn new(keymap: KeyMap, held: HeldKeys, log_capacity: usize) -> Self {
        Self {
            self_id: None,
            participants: Vec::new(),
            log: VecDeque::new(),
            log_capacity: log_capacity.max(1),
            compose: String::new(),
            composing: false,
            keymap,
            held,
        }
    }

    /// Fold a server event into the view
    pub fn apply(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::Welcome(welcome) => {
                self.self_id = Some(welcome.id);
            }
            ServerMessage::NewPositions(participants) => {
                self.participants = participants;
            }
            ServerMessage::Message(line) => {
                if self.log.len() == self.log_capacity {
                    self.log.pop_front();
                }
                self.log.push_back(line);
            }
        }
    }

    /// A movement key went down. Suppressed while composing.
    pub fn key_down(&mut self, key: &str, now: Instant) -> Option<ClientMessage> {
        if self.composing {
            return None;
        }
        let direction = self.keymap.direction(key)?;
        self.held.press(direction, now).map(ClientMessage::KeyPress)
    }

    pub fn key_up(&mut self, key: &str) -> Option<ClientMessage> {
        let direction = self.keymap.direction(key)?;
        self.held.release(direction).map(ClientMessage::KeyPress)
    }

    /// Releases for keys the terminal stopped repeating
    pub fn expire_held(&mut self, now: Instant) -> Vec<ClientMessage> {
        self.held
            .expire(now)
            .into_iter()
            .map(ClientMessage::KeyPress)
            .collect()
    }

    /// Enter compose mode. Any held direction is released so the avatar
    /// stops while typing.
    pub fn start_composing(&mut self) -> Vec<ClientMessage> {
        self.composing = true;
        self.held
            .release_all()
            .into_iter()
            .map(ClientMessage::KeyPress)
            .collect()
    }

    /// Leave compose mode without sending; the draft is kept
    pub fn cancel_composing(&mut self) {
        self.composing = false;
    }

    pub fn push_char(&mut self, c: char) {
        if self.composing {
            self.compose.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.composing {
            self.compose.pop();
        }
    }

    /// Send the draft and clear it. Blank drafts send nothing.
    pub fn submit(&mut self) -> Option<ClientMessage> {
        self.composing = false;
        let text = self.compose.trim().to_string();
        self.compose.clear();
        if text.is_empty() {
            None
        } else {
            Some(ClientMessage::Message(text))
        }
    }

    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    pub fn is_self(&self, id: &str) -> bool {
        self.self_id.as_deref() == Some(id)
    }

    pub fn participants(&self) -> &[ParticipantView] {
        &self.participants
    }

    pub fn me(&self) -> Option<&ParticipantView> {
        let id = self.self_id.as_deref()?;
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn log(&self) -> impl Iterator<Item = &ChatLine> {
        self.log.iter()
    }

    pub fn compose_text(&self) -> &str {
        &self.compose
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }
}
