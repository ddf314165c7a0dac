use thiserror::Error;

/// Top-level error type for the Healio client.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for HealioError` so
/// that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HealioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HealioError {
    fn from(err: toml::de::Error) -> Self {
        HealioError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HealioError {
    fn from(err: toml::ser::Error) -> Self {
        HealioError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for HealioError {
    fn from(err: serde_json::Error) -> Self {
        HealioError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Healio operations.
pub type Result<T> = std::result::Result<T, HealioError>;
