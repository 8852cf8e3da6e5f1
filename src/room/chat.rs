use super::Room;
use crate::types::*;

impl Room {
    /// Attach a chat message to its sender and produce the line to relay.
    ///
    /// Returns `None` for unknown senders and for text that is empty after
    /// trimming. Long text is cut to `max_message_chars` characters.
    pub fn chat(&mut self, id: &str, text: &str) -> Option<ChatLine> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let text = truncate_chars(text, self.max_message_chars);
        if text.is_empty() {
            return None;
        }

        let participant = self.get_mut(id)?;
        participant.sent_message = true;
        participant.current_message = text.clone();

        Some(ChatLine {
            sender_id: participant.id.clone(),
            text,
        })
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
