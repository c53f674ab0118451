mod config;
mod error;
mod logging;
mod responder;
mod say;

#[cfg(feature = "chat")]
mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Overrides, SeedMode, load_config, resolve_settings};

#[derive(Parser)]
#[command(name = "cbx")]
#[command(about = "A small terminal chat widget with a canned bot", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Initial conversation: demo or empty
    #[arg(long, global = true)]
    seed: Option<SeedMode>,

    /// External program that produces replies (reads stdin, writes stdout)
    #[arg(long, global = true)]
    command: Option<String>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command_kind: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "chat")]
    /// Start an interactive chat
    Chat,

    /// Send messages without the UI and print the conversation
    Say {
        /// Messages to send, in order
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let settings = resolve_settings(
        config,
        Overrides {
            seed: cli.seed,
            command: cli.command,
            log_file: cli.log_file,
        },
    );

    logging::init(settings.log_file.as_deref())?;

    let responder = responder::from_settings(&settings);

    match cli.command_kind {
        #[cfg(feature = "chat")]
        Command::Chat => {
            let app = chat::ChatApp::new(
                settings.seed.messages(),
                responder,
                responder::describe(&settings),
            );
            chat::run(app).await?;
        }
        Command::Say { messages } => {
            let mut stdout = std::io::stdout().lock();
            say::run(settings.seed.messages(), responder.as_ref(), &messages, &mut stdout)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_flag_parses_without_a_config() {
        let cli = Cli::try_parse_from(["cbx", "--seed", "empty", "say", "hi"]).unwrap();
        assert_eq!(cli.seed, Some(SeedMode::Empty));
        assert!(matches!(cli.command_kind, Command::Say { ref messages } if messages == &["hi"]));
    }

    #[test]
    fn unknown_seed_is_rejected() {
        assert!(Cli::try_parse_from(["cbx", "--seed", "full", "say", "hi"]).is_err());
    }
}
