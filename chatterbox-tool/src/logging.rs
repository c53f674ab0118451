use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::CbxError;

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> Result<EnvFilter, CbxError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER).map_err(|e| CbxError::LogFilter(e.to_string())),
    }
}

/// Sends tracing output to `log_file`, appending.
///
/// Without a log file nothing is installed: stdout belongs to the terminal UI.
pub fn init(log_file: Option<&Path>) -> Result<(), CbxError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(path = %path.display(), "Logging initialised");
    Ok(())
}
