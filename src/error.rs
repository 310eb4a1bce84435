use thiserror::Error;

/// Errors that can occur while building a grocery list
#[derive(Error, Debug)]
pub enum GroceryError {
    /// HTTP transport failure talking to an external API
    #[error("Request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Required configuration is missing or invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration sources could not be loaded
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),

    /// The LLM API answered with an error or an unusable reply
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// The video search or transcript API failed
    #[error("Video lookup failed: {0}")]
    VideoError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Writing an export failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serializing output failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
