//! Error types for the interview assistant

use thiserror::Error;

/// Result type alias for interview assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the interview assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing or unusable credentials, bad settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Key document could not be opened or parsed
    #[error("document error: {0}")]
    Document(String),

    /// Text generation error
    #[error("generation error: {0}")]
    Generation(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Synthesis(String),

    /// Service account authentication error
    #[error("auth error: {0}")]
    Auth(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
