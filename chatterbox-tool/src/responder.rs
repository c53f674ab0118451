use std::sync::Arc;

use chatterbox_core::{CannedResponder, CommandResponder, ResponseProvider};
use tracing::info;

use crate::config::Settings;

/// Builds the responder named by `settings`: an external command if one is
/// configured, otherwise the canned bot with any extra rules.
pub fn from_settings(settings: &Settings) -> Arc<dyn ResponseProvider> {
    match &settings.responder {
        Some(cfg) => {
            info!(command = %cfg.command, "Using command responder");
            Arc::new(CommandResponder::new(cfg.command.clone(), cfg.args.clone()))
        }
        None => {
            info!(rules = settings.responses.len(), "Using canned responder");
            Arc::new(CannedResponder::with_rules(settings.responses.clone()))
        }
    }
}

/// Short label for the header bar.
pub fn describe(settings: &Settings) -> String {
    match &settings.responder {
        Some(cfg) => format!("command: {}", cfg.command),
        None => "canned".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResponderConfig, SeedMode};
    use chatterbox_core::ResponseRule;

    fn settings(responder: Option<ResponderConfig>) -> Settings {
        Settings {
            seed: SeedMode::Empty,
            log_file: None,
            responder,
            responses: vec![ResponseRule::new("ping", "pong")],
        }
    }

    #[test]
    fn canned_uses_configured_rules() {
        let s = settings(None);
        let responder = from_settings(&s);
        assert_eq!(responder.respond("ping?").unwrap(), "pong");
        assert_eq!(describe(&s), "canned");
    }

    #[cfg(unix)]
    #[test]
    fn command_responder_is_used_when_configured() {
        let s = settings(Some(ResponderConfig {
            command: "cat".to_string(),
            args: vec![],
        }));
        let responder = from_settings(&s);
        assert_eq!(responder.respond("ping").unwrap(), "ping");
        assert_eq!(describe(&s), "command: cat");
    }
}
