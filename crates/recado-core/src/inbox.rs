use std::collections::VecDeque;

use recado_types::models::{Message, MessageKind};

/// FIFO queue of unread messages of mixed kinds. Reads take the oldest
/// message of the requested kind and leave every other message in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    messages: VecDeque<Message>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Remove and return the oldest message of `kind`.
    pub fn pop_first(&mut self, kind: MessageKind) -> Option<Message> {
        let idx = self.messages.iter().position(|m| m.kind == kind)?;
        self.messages.remove(idx)
    }

    /// Drop every message sent by `sender`.
    pub fn discard_from(&mut self, sender: &str) {
        self.messages.retain(|m| m.sender != sender);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<Message> for Inbox {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}
