use thiserror::Error;

/// Failure of a single remote generation call. Every variant is recoverable:
/// the user may resubmit the same text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Request timeout")]
    Timeout,
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Gemini client is not configured")]
    NotConfigured,
    #[error("Invalid conversation state: {0}")]
    InvalidState(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else if err.is_decode() {
            GenerationError::MalformedResponse(err.to_string())
        } else {
            GenerationError::Network(err)
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(err.to_string())
    }
}

/// Outcome of a rejected turn. Either way the speculative user message has
/// already been removed from the log when this is returned.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Error)]
pub enum GemchatError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for GemchatError {
    fn from(err: anyhow::Error) -> Self {
        GemchatError::Other(format!("{:#}", err))
    }
}

impl From<String> for GemchatError {
    fn from(msg: String) -> Self {
        GemchatError::Other(msg)
    }
}

impl From<&str> for GemchatError {
    fn from(msg: &str) -> Self {
        GemchatError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GemchatError>;
