use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ResponseError::Unavailable(reason.into())
    }
}
