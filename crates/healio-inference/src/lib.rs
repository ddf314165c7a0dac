//! Inference client for the remote generative-language endpoint.
//!
//! Sends the full prompt context (priming turns plus transcript) to the
//! Gemini `generateContent` method and extracts the first reply text.

pub mod client;
pub mod error;
pub mod gemini;

pub use client::InferenceClient;
pub use error::InferenceError;
pub use gemini::GeminiClient;
