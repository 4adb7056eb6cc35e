//! Chat transcript shown next to the plot

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Identifier of a message within one transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageId(pub u64);

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered list of chat messages
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    #[serde(skip)]
    next_id: u64,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript opening with a model greeting
    pub fn with_welcome(welcome: &str) -> Self {
        let mut transcript = Self::new();
        if !welcome.is_empty() {
            transcript.push(Role::Model, welcome);
        }
        transcript
    }

    /// Append a message and return its id
    pub fn push(&mut self, role: Role, content: &str) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
        id
    }

    /// Append text to an existing message; returns `false` if it no longer exists
    pub fn append(&mut self, id: MessageId, text: &str) -> bool {
        match self.get_mut(id) {
            Some(message) => {
                message.content.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Remove a message
    pub fn remove(&mut self, id: MessageId) -> Option<ChatMessage> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(index))
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Messages in order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
