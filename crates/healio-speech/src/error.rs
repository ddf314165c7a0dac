//! Error types for speech playback.
//!
//! Playback failures are never shown to the user; they are logged and the
//! adapter falls back to Idle.

use healio_core::error::HealioError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("failed to start speech program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to stop playback: {0}")]
    Stop(String),
    #[error("speech playback is not available: {0}")]
    NotAvailable(String),
}

impl From<SpeechError> for HealioError {
    fn from(err: SpeechError) -> Self {
        HealioError::Speech(err.to_string())
    }
}
