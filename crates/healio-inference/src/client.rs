use async_trait::async_trait;
use healio_core::types::Turn;

use crate::error::InferenceError;

/// A stateless completion backend.
///
/// `context` is the complete prompt in conversation order, hidden priming
/// turns included. An empty reply is `Ok(String::new())`, not an error.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, context: &[Turn]) -> Result<String, InferenceError>;
}
