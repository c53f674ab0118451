use std::io::Write;

use chatterbox_core::{InputController, Message, MessageStore, ResponseProvider};

use crate::error::CbxError;

/// Submits each of `prompts` in order and writes the whole conversation to
/// `out`, one `sender: text` line per message.
pub fn run(
    seed: Vec<Message>,
    responder: &dyn ResponseProvider,
    prompts: &[String],
    out: &mut impl Write,
) -> Result<(), CbxError> {
    let mut store = MessageStore::with_messages(seed);
    let mut input = InputController::new();

    for prompt in prompts {
        input.set_pending(prompt.as_str());
        input.submit(&mut store, responder);
    }

    for message in store.current() {
        writeln!(out, "{}: {}", message.sender(), message.text())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatterbox_core::CannedResponder;

    #[test]
    fn prints_each_exchange() {
        let mut out = Vec::new();
        let prompts = vec!["a".to_string(), "bc".to_string()];
        let reverse = |s: &str| s.chars().rev().collect::<String>();

        run(Vec::new(), &reverse, &prompts, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "user: a\nbot: a\nuser: bc\nbot: cb\n"
        );
    }

    #[test]
    fn seed_is_printed_first() {
        let mut out = Vec::new();
        let prompts = vec!["thank you".to_string()];

        run(
            vec![Message::bot("Welcome")],
            &CannedResponder::new(),
            &prompts,
            &mut out,
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "bot: Welcome\nuser: thank you\nbot: No problem! Let me know if you need help with anything else!\n"
        );
    }
}
