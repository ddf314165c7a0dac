//! Error types for the inference client.

use healio_core::error::HealioError;

/// Errors from the inference client.
///
/// Every transport, status, or decoding failure collapses into
/// `InferenceFailed`; the reason is kept for logs only.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },
    #[error("no API key configured: set HEALIO_API_KEY or inference.api_key")]
    MissingApiKey,
}

impl InferenceError {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        InferenceError::InferenceFailed {
            reason: reason.into(),
        }
    }
}

impl From<InferenceError> for HealioError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::MissingApiKey => HealioError::Config(err.to_string()),
            InferenceError::InferenceFailed { .. } => HealioError::Inference(err.to_string()),
        }
    }
}
