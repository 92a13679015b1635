use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankboardError {
    /// The scores backend answered but did not deliver a dataset.
    #[error("{0}")]
    FetchFailure(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RankboardError>;

/// Error message used when a failure carries no text of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred.";

impl RankboardError {
    /// Message shown to the user when a fetch ends in this error.
    ///
    /// Backend-supplied messages are passed through verbatim.
    pub fn display_message(&self) -> String {
        let message = match self {
            RankboardError::FetchFailure(message) => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}
