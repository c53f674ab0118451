use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CbxError {
    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid log filter: {0}")]
    LogFilter(String),
}
