//! Gemini REST API client.
//!
//! Calls `{base_url}/{model}:generateContent?key=...` directly. One attempt
//! per call, no retry, no timeout beyond the transport default.

use async_trait::async_trait;
use healio_core::config::InferenceConfig;
use healio_core::types::{Role, Turn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::InferenceClient;
use crate::error::InferenceError;

/// Client for the Gemini `generateContent` method.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// Fails with `MissingApiKey` when the key is blank so that a missing
    /// secret is reported at startup instead of on the first message.
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(InferenceError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, InferenceError> {
        let endpoint = self.endpoint();
        tracing::debug!(
            endpoint = %endpoint,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            // reqwest errors print the URL, and the URL carries the key.
            .map_err(|err| InferenceError::failed(format!("request failed: {}", err.without_url())))?;

        let status = response.status();
        let body_text = response.text().await.map_err(|err| {
            InferenceError::failed(format!("failed to read body: {}", err.without_url()))
        })?;

        if !status.is_success() {
            return Err(InferenceError::failed(describe_http_error(status, &body_text)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)
            .map_err(|err| InferenceError::failed(format!("failed to parse response: {err}")))?;

        Ok(extract_reply(parsed))
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    async fn complete(&self, context: &[Turn]) -> Result<String, InferenceError> {
        let request = GenerateContentRequest::from_turns(context);
        match self.send_request(&request).await {
            Ok(reply) => {
                tracing::info!(
                    model = %self.model,
                    reply_len = reply.len(),
                    "Gemini reply received"
                );
                Ok(reply)
            }
            Err(err) => {
                tracing::warn!(model = %self.model, error = %err, "Gemini request failed");
                Err(err)
            }
        }
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub(crate) contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub(crate) fn from_turns(turns: &[Turn]) -> Self {
        Self {
            contents: turns
                .iter()
                .map(|turn| Content {
                    role: turn.role(),
                    parts: vec![Part {
                        text: turn.text().to_string(),
                    }],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    role: Role,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Option<Vec<Option<Candidate>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Option<Vec<Option<PartResponse>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// `candidates[0].content.parts[0].text`, or empty when any level is missing.
fn extract_reply(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next().flatten())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts?.into_iter().next().flatten())
        .and_then(|part| part.text)
        .unwrap_or_default()
}

fn describe_http_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let message = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(s) if !s.is_empty() => format!("{s}: {message}"),
                _ => message,
            })
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    format!("HTTP {}: {}", status.as_u16(), detail)
}
