use std::sync::Arc;

use chatterbox_core::{
    InputController, Message, MessageListView, MessageStore, PendingReply, ResponseError,
    ResponseProvider,
};
use tokio::sync::oneshot;
use tracing::debug;

type ReplyResult = Result<String, ResponseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Chat,
    Loading,
}

/// A submitted prompt whose reply is being computed on the blocking pool.
struct InFlight {
    reply: PendingReply,
    rx: oneshot::Receiver<ReplyResult>,
}

/// Top-level view: owns the conversation and hands its children a read-only
/// slice (the list) or a sink (the input).
pub struct ChatApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub input: InputController,
    pub view: MessageListView,
    pub last_error: Option<String>,
    pub responder_label: String,
    store: MessageStore,
    responder: Arc<dyn ResponseProvider>,
    in_flight: Option<InFlight>,
}

impl ChatApp {
    pub fn new(
        seed: Vec<Message>,
        responder: Arc<dyn ResponseProvider>,
        responder_label: impl Into<String>,
    ) -> Self {
        let mut store = MessageStore::with_messages(seed);
        let view = MessageListView::attached(&mut store);

        Self {
            mode: AppMode::Chat,
            should_quit: false,
            input: InputController::new(),
            view,
            last_error: None,
            responder_label: responder_label.into(),
            store,
            responder,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.store.current()
    }

    /// Submits the draft. The user message is appended immediately; the
    /// reply is computed off the event loop and appended by
    /// [`ChatApp::poll_response`].
    ///
    /// Ignored while a reply is outstanding, so append pairs never interleave.
    pub fn send_message(&mut self) {
        if self.mode != AppMode::Chat {
            return;
        }

        let reply = self.input.begin_submit(&mut self.store);
        let prompt = reply.prompt().to_string();
        let responder = Arc::clone(&self.responder);
        let (tx, rx) = oneshot::channel();

        tokio::task::spawn_blocking(move || {
            let _ = tx.send(responder.respond(&prompt));
        });

        self.in_flight = Some(InFlight { reply, rx });
        self.mode = AppMode::Loading;
        self.last_error = None;
    }

    /// Appends the reply if it has arrived.
    pub fn poll_response(&mut self) {
        let result = match self.in_flight.as_mut() {
            Some(in_flight) => match in_flight.rx.try_recv() {
                Ok(result) => result,
                Err(oneshot::error::TryRecvError::Empty) => return,
                Err(oneshot::error::TryRecvError::Closed) => {
                    Err(ResponseError::unavailable("responder task ended"))
                }
            },
            None => return,
        };

        if let Some(in_flight) = self.in_flight.take() {
            self.complete(in_flight.reply, result);
        }
    }

    /// Waits for the outstanding reply, if any, and appends it.
    pub async fn wait_for_reply(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            let result = in_flight
                .rx
                .await
                .unwrap_or_else(|_| Err(ResponseError::unavailable("responder task ended")));
            self.complete(in_flight.reply, result);
        }
    }

    /// Stops the responder so an outstanding reply cannot outlive the UI.
    pub fn shutdown(&mut self) {
        if self.in_flight.is_some() {
            debug!("Shutting down with a reply in flight");
        }
        self.responder.shutdown();
    }

    fn complete(&mut self, reply: PendingReply, result: ReplyResult) {
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }

        reply.finish(result, &mut self.store);
        self.mode = AppMode::Chat;
        debug!(messages = self.store.len(), "Reply appended");
    }

    pub fn scroll_up(&mut self) {
        self.view.scroll_mut().scroll_up(1);
    }

    pub fn scroll_down(&mut self) {
        self.view.scroll_mut().scroll_down(1);
    }

    pub fn page_up(&mut self) {
        self.view.scroll_mut().page_up();
    }

    pub fn page_down(&mut self) {
        self.view.scroll_mut().page_down();
    }
}
