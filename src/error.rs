use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Google API key is not configured")]
    MissingApiKey,
    /// Never holds the request URL, which carries the API key.
    #[error("{0}")]
    Http(reqwest::Error),
    #[error("Failed to synthesize speech")]
    Synthesis,
    #[error("{0}")]
    Decode(String),
    #[error("Audio error: {0}")]
    Audio(String),
    #[error("A synthesis request is already in progress")]
    Busy,
    #[error("{0}")]
    Message(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}
