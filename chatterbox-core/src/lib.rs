//! Conversation state for a single-page chat widget.
//!
//! A conversation is an append-only list of messages owned by one top-level
//! view. Writers get a [`MessageSink`], readers get a slice:
//! - [`InputController`] holds the draft and performs the user/bot append pair
//! - [`MessageStore`] owns the ordered messages and notifies observers
//! - [`MessageListView`] projects the messages into rows and keeps the
//!   viewport anchored to the newest one
//!
//! # Example
//!
//! ```
//! use chatterbox_core::{InputController, MessageStore, Sender};
//!
//! let mut store = MessageStore::new();
//! let mut input = InputController::new();
//!
//! input.set_pending("hi");
//! input.submit(&mut store, &|_: &str| "hello".to_string());
//!
//! let texts: Vec<_> = store.current().iter().map(|m| (m.sender(), m.text())).collect();
//! assert_eq!(texts, vec![(Sender::User, "hi"), (Sender::Bot, "hello")]);
//! assert_eq!(input.pending(), "");
//! ```

mod error;
mod input;
mod message;
mod response;
mod scroll;
mod seed;
mod store;
mod view;

pub use error::ResponseError;
pub use input::{InputController, PendingReply, fallback_reply};
pub use message::{Message, MessageId, Sender};
pub use response::{CannedResponder, CommandResponder, ResponseProvider, ResponseRule};
pub use scroll::{ScrollAnchor, ScrollManager};
pub use seed::demo_seed;
pub use store::{MessageSink, MessageStore};
pub use view::{MessageListView, MessageRow, Rows};
