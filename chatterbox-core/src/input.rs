use tracing::{instrument, warn};

use crate::error::ResponseError;
use crate::message::Message;
use crate::response::ResponseProvider;
use crate::store::MessageSink;

/// Bot text used when the responder fails.
pub fn fallback_reply(err: &ResponseError) -> String {
    format!("Sorry, I couldn't reply: {}", err)
}

/// Draft text plus the submit protocol that turns it into a user/bot pair.
///
/// The cursor is a byte offset into the draft and always sits on a char
/// boundary.
#[derive(Debug, Default)]
pub struct InputController {
    draft: String,
    cursor: usize,
}

/// A submitted prompt whose bot reply has not been appended yet.
///
/// Produced by [`InputController::begin_submit`]. The user message is already
/// in the conversation; [`PendingReply::finish`] appends the reply.
#[derive(Debug)]
#[must_use = "the bot reply is only appended by `finish`"]
pub struct PendingReply {
    prompt: String,
}

impl PendingReply {
    /// The draft text as it was when submitted.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Appends the bot message. A failed response still appends a bot
    /// message, carrying the fallback text.
    pub fn finish(self, reply: Result<String, ResponseError>, sink: &mut impl MessageSink) {
        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Responder failed, using fallback reply");
                fallback_reply(&e)
            }
        };

        sink.append(Message::bot(text));
    }
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the draft. Does not touch the conversation.
    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.cursor = self.draft.len();
    }

    /// Submits the draft and appends the reply from `responder`.
    ///
    /// Always appends exactly two messages, user first. Empty drafts are
    /// submitted like any other.
    #[instrument(skip_all, fields(len = self.draft.len()))]
    pub fn submit<R>(&mut self, sink: &mut impl MessageSink, responder: &R)
    where
        R: ResponseProvider + ?Sized,
    {
        let pending = self.begin_submit(sink);
        let reply = responder.respond(pending.prompt());
        pending.finish(reply, sink);
    }

    /// First half of [`InputController::submit`]: appends the user message
    /// and clears the draft.
    pub fn begin_submit(&mut self, sink: &mut impl MessageSink) -> PendingReply {
        let prompt = std::mem::take(&mut self.draft);
        sink.append(Message::user(prompt.clone()));
        self.cursor = 0;

        PendingReply { prompt }
    }

    pub fn insert_char(&mut self, c: char) {
        self.draft.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.draft.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.draft.len() {
            self.draft.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.draft.len() {
            self.cursor = self.draft[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.draft.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.draft.len();
    }

    /// The part of the draft left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.draft[..self.cursor]
    }

    fn prev_boundary(&self) -> usize {
        self.draft[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use crate::store::MessageStore;

    fn transcript(store: &MessageStore) -> Vec<(Sender, &str)> {
        store
            .current()
            .iter()
            .map(|m| (m.sender(), m.text()))
            .collect()
    }

    #[test]
    fn set_pending_overwrites_without_appending() {
        let store = MessageStore::new();
        let mut input = InputController::new();

        input.set_pending("first");
        input.set_pending("second");

        assert_eq!(input.pending(), "second");
        assert_eq!(input.cursor(), 6);
        assert!(store.is_empty());
    }

    #[test]
    fn responder_gets_the_draft_text() {
        let mut store = MessageStore::new();
        let mut input = InputController::new();

        input.set_pending("echo me");
        input.submit(&mut store, &|s: &str| format!("you said {}", s));

        assert_eq!(
            transcript(&store),
            vec![(Sender::User, "echo me"), (Sender::Bot, "you said echo me")]
        );
    }

    #[test]
    fn failed_response_appends_fallback() {
        struct Down;
        impl ResponseProvider for Down {
            fn respond(&self, _: &str) -> Result<String, ResponseError> {
                Err(ResponseError::unavailable("offline"))
            }
        }

        let mut store = MessageStore::new();
        let mut input = InputController::new();
        input.set_pending("anyone?");
        input.submit(&mut store, &Down);

        assert_eq!(
            transcript(&store),
            vec![
                (Sender::User, "anyone?"),
                (Sender::Bot, "Sorry, I couldn't reply: response unavailable: offline")
            ]
        );
        assert_eq!(input.pending(), "");
    }

    #[test]
    fn begin_submit_appends_user_and_clears() {
        let mut store = MessageStore::new();
        let mut input = InputController::new();
        input.set_pending("later");

        let pending = input.begin_submit(&mut store);
        assert_eq!(pending.prompt(), "later");
        assert_eq!(input.pending(), "");
        assert_eq!(input.cursor(), 0);
        assert_eq!(transcript(&store), vec![(Sender::User, "later")]);

        // Typing while the reply is outstanding does not affect it.
        input.set_pending("next");
        pending.finish(Ok("done".to_string()), &mut store);
        assert_eq!(
            transcript(&store),
            vec![(Sender::User, "later"), (Sender::Bot, "done")]
        );
        assert_eq!(input.pending(), "next");
    }

    #[test]
    fn works_with_dyn_responder() {
        let responder: Box<dyn ResponseProvider> = Box::new(|_: &str| "boxed".to_string());
        let mut store = MessageStore::new();
        let mut input = InputController::new();

        input.submit(&mut store, responder.as_ref());
        assert_eq!(store.current()[1].text(), "boxed");
    }

    #[test]
    fn editing_is_utf8_aware() {
        let mut input = InputController::new();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.before_cursor(), "héllo");

        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.pending(), "hllo");
        assert_eq!(input.before_cursor(), "h");

        input.insert_char('ë');
        assert_eq!(input.pending(), "hëllo");

        input.move_home();
        input.delete();
        assert_eq!(input.pending(), "ëllo");

        input.move_right();
        assert_eq!(input.cursor(), 'ë'.len_utf8());

        input.move_end();
        input.backspace();
        assert_eq!(input.pending(), "ëll");
    }

    #[test]
    fn edges_are_noops() {
        let mut input = InputController::new();
        input.backspace();
        input.delete();
        input.move_left();
        input.move_right();
        assert_eq!(input.pending(), "");
        assert_eq!(input.cursor(), 0);
    }
}
