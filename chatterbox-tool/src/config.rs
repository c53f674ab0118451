use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chatterbox_core::{Message, ResponseRule, demo_seed};
use serde::Deserialize;

use crate::error::CbxError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    #[default]
    Demo,
    Empty,
}

impl SeedMode {
    pub fn messages(self) -> Vec<Message> {
        match self {
            SeedMode::Demo => demo_seed(),
            SeedMode::Empty => Vec::new(),
        }
    }
}

impl std::str::FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "demo" => Ok(SeedMode::Demo),
            "empty" | "none" => Ok(SeedMode::Empty),
            _ => Err(format!("unknown seed: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResponderConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResponseRuleConfig {
    pub keyword: String,
    pub reply: String,
}

impl From<ResponseRuleConfig> for ResponseRule {
    fn from(rule: ResponseRuleConfig) -> Self {
        ResponseRule::new(rule.keyword, rule.reply)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub seed: SeedMode,
    pub log_file: Option<PathBuf>,
    pub responder: Option<ResponderConfig>,
    #[serde(default)]
    pub responses: Vec<ResponseRuleConfig>,
}

/// Settings after CLI flags have been applied over the config file.
#[derive(Debug)]
pub struct Settings {
    pub seed: SeedMode,
    pub log_file: Option<PathBuf>,
    pub responder: Option<ResponderConfig>,
    pub responses: Vec<ResponseRule>,
}

/// Command-line values that override the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub seed: Option<SeedMode>,
    pub command: Option<String>,
    pub log_file: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chatterbox").join("config.toml"))
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, CbxError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e.into()),
    };

    toml::from_str(&content).map_err(|source| CbxError::Config {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<Config, CbxError> {
    match path {
        Some(path) => load_config_from(path),
        None => match default_config_path() {
            Some(path) => load_config_from(&path),
            None => Ok(Config::default()),
        },
    }
}

pub fn resolve_settings(config: Config, overrides: Overrides) -> Settings {
    let responder = match overrides.command {
        Some(command) => Some(ResponderConfig {
            command,
            args: Vec::new(),
        }),
        None => config.responder,
    };

    Settings {
        seed: overrides.seed.unwrap_or(config.seed),
        log_file: overrides.log_file.or(config.log_file),
        responder,
        responses: config.responses.into_iter().map(Into::into).collect(),
    }
}
