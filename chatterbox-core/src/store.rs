use std::fmt;

use tracing::debug;

use crate::message::Message;

type Observer = Box<dyn FnMut(&[Message]) + Send>;

/// Write capability handed to components that add messages.
///
/// Holders can append but never read back, reorder or remove.
pub trait MessageSink {
    fn append(&mut self, message: Message);
}

/// Ordered, append-only conversation state.
///
/// Insertion order is display order. Observers registered with
/// [`MessageStore::subscribe`] run after every append with the full sequence.
#[derive(Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    observers: Vec<Observer>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `seed` as its initial conversation.
    pub fn with_messages(seed: Vec<Message>) -> Self {
        Self {
            messages: seed,
            observers: Vec::new(),
        }
    }

    /// Adds `message` at the end and notifies observers. Never fails.
    pub fn append(&mut self, message: Message) {
        debug!(id = %message.id(), sender = %message.sender(), len = self.messages.len() + 1, "append");
        self.messages.push(message);

        for observer in &mut self.observers {
            observer(&self.messages);
        }
    }

    pub fn current(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Registers a hook that runs after every append.
    pub fn subscribe(&mut self, observer: impl FnMut(&[Message]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }
}

impl MessageSink for MessageStore {
    fn append(&mut self, message: Message) {
        MessageStore::append(self, message);
    }
}

impl fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageStore")
            .field("messages", &self.messages)
            .field("observers", &self.observers.len())
            .finish()
    }
}
