use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use chrono::Local;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::error::ResponseError;

const DEFAULT_REPLY: &str = "Sorry, I didn't quite understand that. Currently, I am only able to \
flip a coin, roll a dice, or get today's date. Let me know how I can help!";

/// Maps the text a user submitted to the bot's reply.
pub trait ResponseProvider: Send + Sync {
    fn respond(&self, input: &str) -> Result<String, ResponseError>;

    /// Aborts replies in progress so blocked [`respond`](Self::respond)
    /// calls return promptly. Later calls may fail.
    fn shutdown(&self) {}
}

impl<F> ResponseProvider for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn respond(&self, input: &str) -> Result<String, ResponseError> {
        Ok(self(input))
    }
}

/// A keyword and the fixed reply it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRule {
    pub keyword: String,
    pub reply: String,
}

impl ResponseRule {
    pub fn new(keyword: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into().to_lowercase(),
            reply: reply.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Builtin {
    Fixed(&'static str),
    CoinFlip,
    DiceRoll,
    Date,
}

const BUILTINS: &[(&str, Builtin)] = &[
    ("hello", Builtin::Fixed("Hello! How can I help you?")),
    ("how are you", Builtin::Fixed("I'm doing great! How can I help you?")),
    ("flip a coin", Builtin::CoinFlip),
    ("roll a dice", Builtin::DiceRoll),
    ("date", Builtin::Date),
    (
        "thank",
        Builtin::Fixed("No problem! Let me know if you need help with anything else!"),
    ),
];

impl Builtin {
    fn reply(self) -> String {
        match self {
            Builtin::Fixed(text) => text.to_string(),
            Builtin::CoinFlip => {
                let side = if rand::thread_rng().gen_bool(0.5) {
                    "heads"
                } else {
                    "tails"
                };
                format!("Sure! You got {}", side)
            }
            Builtin::DiceRoll => {
                let roll: u8 = rand::thread_rng().gen_range(1..=6);
                format!("Sure! You got {}", roll)
            }
            Builtin::Date => format!("Today is {}", Local::now().format("%B %-d")),
        }
    }
}

/// Keyword chatbot with a small set of built-in answers.
///
/// Matching is a case-insensitive substring test; the first matching rule
/// wins. Custom rules are checked before the built-ins.
#[derive(Debug, Clone, Default)]
pub struct CannedResponder {
    rules: Vec<ResponseRule>,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = ResponseRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn add_rule(&mut self, rule: ResponseRule) {
        self.rules.push(rule);
    }

    fn reply_to(&self, input: &str) -> String {
        let input = input.to_lowercase();

        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| !r.keyword.is_empty() && input.contains(&r.keyword))
        {
            return rule.reply.clone();
        }

        BUILTINS
            .iter()
            .find(|(keyword, _)| input.contains(keyword))
            .map(|(_, builtin)| builtin.reply())
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }
}

impl ResponseProvider for CannedResponder {
    fn respond(&self, input: &str) -> Result<String, ResponseError> {
        Ok(self.reply_to(input))
    }
}

/// Delegates replies to an external program.
///
/// The input is written to the program's stdin; its stdout, with trailing
/// whitespace removed, is the reply. Programs still running when
/// [`ResponseProvider::shutdown`] is called are killed.
#[derive(Debug)]
pub struct CommandResponder {
    program: String,
    args: Vec<String>,
    running: Running,
}

/// Children currently producing a reply, keyed by spawn order.
#[derive(Debug, Default)]
struct Running {
    next: AtomicU64,
    closed: AtomicBool,
    children: Mutex<HashMap<u64, Child>>,
}

impl Running {
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Child>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, mut child: Child) -> u64 {
        let key = self.next.fetch_add(1, Ordering::Relaxed);
        let mut children = self.lock();
        if self.closed.load(Ordering::SeqCst) {
            kill(key, &mut child);
        }
        children.insert(key, child);
        key
    }

    fn remove(&self, key: u64) -> Option<Child> {
        self.lock().remove(&key)
    }

    fn kill_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for (key, child) in self.lock().iter_mut() {
            kill(*key, child);
        }
    }
}

fn kill(key: u64, child: &mut Child) {
    match child.kill() {
        Ok(()) => debug!(key, pid = child.id(), "Killed responder process"),
        Err(e) => warn!(key, error = %e, "Failed to kill responder process"),
    }
}

fn read_all(mut from: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    from.read_to_end(&mut buf)?;
    Ok(buf)
}

impl CommandResponder {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            running: Running::default(),
        }
    }
}

impl ResponseProvider for CommandResponder {
    #[instrument(skip(self, input), fields(program = %self.program))]
    fn respond(&self, input: &str) -> Result<String, ResponseError> {
        if self.running.closed.load(Ordering::SeqCst) {
            return Err(ResponseError::unavailable("responder is shut down"));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ResponseError::unavailable(format!("failed to start {}: {}", self.program, e)))?;

        // Feed stdin from a thread while stdout drains here.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_owned();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });
        let stderr = child.stderr.take().map(|stderr| thread::spawn(move || read_all(stderr)));
        let stdout = child.stdout.take();

        let key = self.running.insert(child);
        let stdout = stdout.map(read_all).transpose();
        let status = match self.running.remove(key) {
            Some(mut child) => child.wait()?,
            None => return Err(ResponseError::unavailable("responder process went missing")),
        };

        if let Some(writer) = writer {
            match writer.join() {
                // The program may exit without reading its input.
                Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                Err(_) => return Err(ResponseError::unavailable("stdin writer panicked")),
                _ => {}
            }
        }
        let stderr = match stderr.map(|reader| reader.join()) {
            Some(Ok(read)) => read?,
            Some(Err(_)) => return Err(ResponseError::unavailable("stderr reader panicked")),
            None => Vec::new(),
        };
        let stdout = stdout?.unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(ResponseError::unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            )));
        }

        debug!(bytes = stdout.len(), "Received reply");

        Ok(String::from_utf8_lossy(&stdout).trim_end().to_string())
    }

    fn shutdown(&self) {
        self.running.kill_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_providers() {
        let reverse = |s: &str| s.chars().rev().collect::<String>();
        assert_eq!(reverse.respond("abc").unwrap(), "cba");
    }

    #[test]
    fn greets_case_insensitively() {
        let bot = CannedResponder::new();
        assert_eq!(bot.respond("HeLLo there").unwrap(), "Hello! How can I help you?");
    }

    #[test]
    fn first_builtin_wins() {
        let bot = CannedResponder::new();
        assert_eq!(
            bot.respond("hello, how are you?").unwrap(),
            "Hello! How can I help you?"
        );
    }

    #[test]
    fn coin_flip_is_heads_or_tails() {
        let bot = CannedResponder::new();
        for _ in 0..20 {
            let reply = bot.respond("flip a coin please").unwrap();
            assert!(
                reply == "Sure! You got heads" || reply == "Sure! You got tails",
                "unexpected reply: {}",
                reply
            );
        }
    }

    #[test]
    fn dice_roll_is_in_range() {
        let bot = CannedResponder::new();
        for _ in 0..20 {
            let reply = bot.respond("roll a dice").unwrap();
            let n: u8 = reply
                .strip_prefix("Sure! You got ")
                .and_then(|n| n.parse().ok())
                .unwrap();
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn date_mentions_today() {
        let bot = CannedResponder::new();
        let reply = bot.respond("what is the date today").unwrap();
        assert!(reply.starts_with("Today is "));
        assert!(reply.contains(&Local::now().format("%B").to_string()));
    }

    #[test]
    fn unknown_input_gets_default() {
        let bot = CannedResponder::new();
        assert_eq!(bot.respond("tell me a joke").unwrap(), DEFAULT_REPLY);
        assert_eq!(bot.respond("").unwrap(), DEFAULT_REPLY);
    }

    #[test]
    fn custom_rules_take_precedence() {
        let bot = CannedResponder::with_rules([ResponseRule::new("Hello", "Hi from config")]);
        assert_eq!(bot.respond("hello").unwrap(), "Hi from config");
        assert_eq!(
            bot.respond("thanks!").unwrap(),
            "No problem! Let me know if you need help with anything else!"
        );
    }

    #[test]
    fn empty_keyword_never_matches() {
        let mut bot = CannedResponder::new();
        bot.add_rule(ResponseRule::new("", "catch-all"));
        assert_eq!(bot.respond("anything").unwrap(), DEFAULT_REPLY);
    }

    #[cfg(unix)]
    #[test]
    fn command_echoes_through_cat() {
        let bot = CommandResponder::new("cat", vec![]);
        assert_eq!(bot.respond("ping\n").unwrap(), "ping");
    }

    #[cfg(unix)]
    #[test]
    fn command_failure_is_unavailable() {
        let bot = CommandResponder::new("false", vec![]);
        match bot.respond("ping") {
            Err(ResponseError::Unavailable(reason)) => assert!(reason.contains("false")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_takes_input_larger_than_a_pipe_buffer() {
        let bot = CommandResponder::new("cat", vec![]);
        let input = "x".repeat(1024 * 1024);
        assert_eq!(bot.respond(&input).unwrap().len(), input.len());
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_kills_a_running_command() {
        use std::sync::Arc;
        use std::time::{Duration, Instant};

        let bot = Arc::new(CommandResponder::new("sleep", vec!["1000".to_string()]));
        let worker = {
            let bot = Arc::clone(&bot);
            thread::spawn(move || bot.respond("ping"))
        };

        let started = Instant::now();
        while bot.running.lock().is_empty() {
            assert!(started.elapsed() < Duration::from_secs(5), "sleep never started");
            thread::sleep(Duration::from_millis(10));
        }
        bot.shutdown();

        assert!(matches!(worker.join().unwrap(), Err(ResponseError::Unavailable(_))));
        assert!(started.elapsed() < Duration::from_secs(30));
        assert!(matches!(bot.respond("again"), Err(ResponseError::Unavailable(_))));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let bot = CommandResponder::new("chatterbox-no-such-program", vec![]);
        assert!(matches!(bot.respond("ping"), Err(ResponseError::Unavailable(_))));
    }
}
