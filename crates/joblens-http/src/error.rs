use thiserror::Error;

pub type Result<T> = std::result::Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid proxy URL: {0}")]
    InvalidProxy(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl HttpError {
    /// Classify a reqwest failure, keeping timeouts distinct.
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
