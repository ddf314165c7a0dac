//! Chat orchestrator: wires the conversation store, sidebar, speech adapter
//! and inference client together.
//!
//! The orchestrator is owned by the event loop. Network calls either run in
//! place through `send`, or off-loop via `client()` with the result fed back
//! through `finish_reply`.

use std::sync::Arc;
use std::time::Instant;

use healio_core::config::HealioConfig;
use healio_core::types::SavedSession;
use healio_inference::{InferenceClient, InferenceError};
use healio_speech::{SpeechAdapter, SpeechEvent, ToggleOutcome};

use crate::error::ChatError;
use crate::priming::default_priming;
use crate::sidebar::{ConfirmChoice, RemoveOutcome, SidebarController};
use crate::store::{ConversationStore, PendingReply, ReplyOutcome};

/// Central coordinator for one chat window.
pub struct ChatOrchestrator {
    store: ConversationStore,
    sidebar: SidebarController,
    speech: SpeechAdapter,
    client: Arc<dyn InferenceClient>,
    auto_speak: bool,
}

impl ChatOrchestrator {
    /// Create an orchestrator with the default priming turns.
    pub fn new(
        config: &HealioConfig,
        client: Arc<dyn InferenceClient>,
        speech: SpeechAdapter,
    ) -> Self {
        Self {
            store: ConversationStore::new(default_priming(), config.sidebar.max_saved_sessions),
            sidebar: SidebarController::new(&config.sidebar, &config.platform),
            speech,
            client,
            auto_speak: config.speech.enabled && config.speech.auto_speak,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn sidebar(&self) -> &SidebarController {
        &self.sidebar
    }

    pub fn speech(&self) -> &SpeechAdapter {
        &self.speech
    }

    /// Shared handle to the inference client for off-loop requests.
    pub fn client(&self) -> Arc<dyn InferenceClient> {
        Arc::clone(&self.client)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.store.set_input(text);
    }

    // -- Messaging --

    /// Start an exchange for `text` without running it.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingReply, ChatError> {
        self.store.begin_request(text)
    }

    /// Start an exchange from the input buffer without running it.
    pub fn begin_submit(&mut self) -> Result<PendingReply, ChatError> {
        self.store.submit_input()
    }

    /// Send `text` and wait for the reply.
    pub async fn send(&mut self, text: &str) -> Result<ReplyOutcome, ChatError> {
        let pending = self.store.begin_request(text)?;
        let result = self.client.complete(pending.context()).await;
        Ok(self.finish_reply(pending, result).await)
    }

    /// Send the input buffer and wait for the reply.
    pub async fn submit(&mut self) -> Result<ReplyOutcome, ChatError> {
        let pending = self.store.submit_input()?;
        let result = self.client.complete(pending.context()).await;
        Ok(self.finish_reply(pending, result).await)
    }

    /// Apply a reply and speak it when auto-speak is on.
    pub async fn finish_reply(
        &mut self,
        pending: PendingReply,
        result: Result<String, InferenceError>,
    ) -> ReplyOutcome {
        let outcome = self.store.complete_request(pending, result);
        if let ReplyOutcome::Replied(reply) = &outcome {
            if self.auto_speak {
                self.speak_reply(reply).await;
            }
        }
        outcome
    }

    /// Toggle speech for a fresh reply. If the previous reply is still
    /// being read, this stops it and the new reply stays silent.
    async fn speak_reply(&mut self, reply: &str) {
        let outcome = self.speech.toggle(reply).await;
        tracing::debug!(?outcome, "Auto-speak");
        self.sync_speaking();
    }

    // -- Speech --

    /// Speak or stop speaking the message at `turn_index`.
    pub async fn toggle_speech(&mut self, turn_index: usize) -> Result<ToggleOutcome, ChatError> {
        let transcript = self.store.transcript();
        let text = transcript
            .get(turn_index)
            .ok_or(ChatError::TurnIndexOutOfRange {
                index: turn_index,
                len: transcript.len(),
            })?
            .text()
            .to_string();
        let outcome = self.speech.toggle(&text).await;
        self.sync_speaking();
        Ok(outcome)
    }

    /// Apply a completion event from the speech engine.
    pub fn handle_speech_event(&mut self, event: SpeechEvent) -> bool {
        let changed = self.speech.handle_event(event);
        self.sync_speaking();
        changed
    }

    fn sync_speaking(&mut self) {
        self.store.set_speaking(self.speech.is_speaking());
    }

    // -- Sessions and sidebar --

    pub fn save_current_session(&mut self) -> &SavedSession {
        self.store.save_current_session()
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar.toggle(&mut self.store, Instant::now())
    }

    pub fn select_session(&mut self, index: usize) -> Result<(), ChatError> {
        self.sidebar.select(&mut self.store, index, Instant::now())
    }

    pub fn new_chat(&mut self) {
        self.sidebar.new_chat(&mut self.store, Instant::now());
    }

    pub fn confirm_and_remove(&mut self, index: usize) -> Result<RemoveOutcome, ChatError> {
        self.sidebar.confirm_and_remove(&mut self.store, index)
    }

    pub fn resolve_removal(
        &mut self,
        choice: ConfirmChoice,
    ) -> Result<Option<SavedSession>, ChatError> {
        self.sidebar.resolve_removal(&mut self.store, choice)
    }
}

// =============================================================================
// Tests
// =============================================================================
