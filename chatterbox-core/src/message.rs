use std::fmt;

use uuid::Uuid;

/// Render identity of a message.
///
/// Generated when the message is created and never derived from its content,
/// so two messages with the same text still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One entry of a conversation. Immutable once created.
/// Each value owns a unique id, so `Message` is not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    text: String,
}

impl Message {
    /// Creates a message with a fresh id.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::fresh(),
            sender,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
