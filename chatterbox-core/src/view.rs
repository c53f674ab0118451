use std::slice;

use crate::message::{Message, MessageId, Sender};
use crate::scroll::ScrollManager;
use crate::store::MessageStore;

/// One rendered entry of the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRow<'a> {
    /// Render identity, stable across re-renders.
    pub key: MessageId,
    pub sender: Sender,
    pub text: &'a str,
}

/// Rows of a conversation in display order.
///
/// Lazy and finite; clone it to walk the rows again.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    inner: slice::Iter<'a, Message>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = MessageRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|m| MessageRow {
            key: m.id(),
            sender: m.sender(),
            text: m.text(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Read-only projection of a conversation that stays scrolled to the newest
/// message.
#[derive(Debug, Default)]
pub struct MessageListView {
    scroll: ScrollManager,
}

impl MessageListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a view that re-anchors to the bottom after every append to `store`.
    pub fn attached(store: &mut MessageStore) -> Self {
        let view = Self::new();
        let anchor = view.scroll.anchor();
        store.subscribe(move |_| anchor.request());
        view
    }

    pub fn rows<'a>(&self, messages: &'a [Message]) -> Rows<'a> {
        Rows {
            inner: messages.iter(),
        }
    }

    pub fn scroll(&self) -> &ScrollManager {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollManager {
        &mut self.scroll
    }
}
