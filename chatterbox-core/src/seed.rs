use crate::message::Message;

/// The demo conversation a fresh chat opens with.
pub fn demo_seed() -> Vec<Message> {
    vec![
        Message::user("Hello chatbot"),
        Message::bot("Hello! How can i help you"),
        Message::user("can you get me todays date?"),
        Message::bot("Today is September 27"),
        Message::user("how about flip a coin"),
        Message::bot("Sure! You got tails"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    #[test]
    fn seed_alternates_user_and_bot() {
        let seed = demo_seed();
        assert_eq!(seed.len(), 6);
        for (i, msg) in seed.iter().enumerate() {
            let expected = if i % 2 == 0 { Sender::User } else { Sender::Bot };
            assert_eq!(msg.sender(), expected);
        }
    }
}
