use super::Room;
use crate::types::*;

impl Room {
    /// Add a participant at the spawn point with no movement intent.
    /// Returns false if the connection already joined.
    pub fn join(&mut self, id: ConnectionId) -> bool {
        if self.participants.contains_key(&id) {
            return false;
        }
        self.order.push(id.clone());
        self.participants
            .insert(id.clone(), Participant::new(id, self.spawn));
        true
    }

    /// Remove a participant. Returns false if it was not present.
    pub fn leave(&mut self, id: &str) -> bool {
        if self.participants.remove(id).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != id);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub(super) fn get_mut(&mut self, id: &str) -> Option<&mut Participant> {
        self.participants.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Broadcast view of every participant, in join order
    pub fn snapshot(&self) -> Vec<ParticipantView> {
        self.order
            .iter()
            .filter_map(|id| self.participants.get(id))
            .map(Participant::view)
            .collect()
    }
}
