//! Conversation store: the single owner of chat state.
//!
//! All mutation of the transcript, the saved-chat list, the input buffer and
//! the UI flags goes through the methods below.

use std::collections::VecDeque;

use healio_core::types::{SavedSession, Transcript, Turn, UiState};
use healio_inference::InferenceError;
use uuid::Uuid;

use crate::error::ChatError;
use crate::priming::default_priming;

/// Message shown for every failed exchange, whatever the cause.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Number of saved sessions kept when no configuration says otherwise.
pub const DEFAULT_MAX_SAVED_SESSIONS: usize = 5;

/// A request that has been started but not yet answered.
///
/// Carries the full prompt context and the session it belongs to. Consumed
/// by `ConversationStore::complete_request`.
#[derive(Debug, Clone)]
pub struct PendingReply {
    epoch: u64,
    user_turn: Turn,
    context: Vec<Turn>,
}

impl PendingReply {
    /// Priming turns, then the transcript, then the pending user turn.
    pub fn context(&self) -> &[Turn] {
        &self.context
    }

    pub fn user_text(&self) -> &str {
        self.user_turn.text()
    }
}

/// What `complete_request` did with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Both turns were appended.
    Replied(String),
    /// The model answered with no text; nothing was appended.
    Empty,
    /// The request failed; the generic error is set, nothing was appended.
    Failed,
    /// The reply belongs to a session that is no longer active.
    Discarded,
}

/// Owns the active transcript, saved sessions, input buffer and UI flags.
#[derive(Debug)]
pub struct ConversationStore {
    priming: Vec<Turn>,
    transcript: Transcript,
    saved: VecDeque<SavedSession>,
    max_saved: usize,
    input: String,
    ui: UiState,
    epoch: u64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(default_priming(), DEFAULT_MAX_SAVED_SESSIONS)
    }
}

impl ConversationStore {
    /// Create an empty store. `max_saved` is clamped to at least one.
    pub fn new(priming: Vec<Turn>, max_saved: usize) -> Self {
        Self {
            priming,
            transcript: Transcript::new(),
            saved: VecDeque::new(),
            max_saved: max_saved.max(1),
            input: String::new(),
            ui: UiState::default(),
            epoch: 0,
        }
    }

    // -- Accessors --

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Saved sessions, most recent first.
    pub fn saved_sessions(&self) -> impl ExactSizeIterator<Item = &SavedSession> {
        self.saved.iter()
    }

    pub fn saved_session(&self, index: usize) -> Option<&SavedSession> {
        self.saved.get(index)
    }

    pub fn saved_len(&self) -> usize {
        self.saved.len()
    }

    pub fn max_saved(&self) -> usize {
        self.max_saved
    }

    /// Index of the saved session with the given id.
    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.saved.iter().position(|s| s.id() == id)
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Take the input buffer, leaving it empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Identifies the active conversation. Changes on new chat and selection.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // -- Transcript --

    /// Append a user turn directly to the transcript.
    pub fn append_user_turn(&mut self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.transcript.push(Turn::user(text));
        Ok(())
    }

    /// Start an exchange for `text`.
    ///
    /// Nothing is appended yet: the user turn only enters the transcript
    /// together with the model's reply.
    /// Whitespace only counts for the emptiness check; the text is sent and
    /// recorded exactly as typed.
    pub fn begin_request(&mut self, text: &str) -> Result<PendingReply, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.ui.loading {
            return Err(ChatError::RequestInFlight);
        }
        if self.ui.sidebar_open {
            return Err(ChatError::SidebarOpen);
        }

        let user_turn = Turn::user(text);
        let mut context =
            Vec::with_capacity(self.priming.len() + self.transcript.len() + 1);
        context.extend(self.priming.iter().cloned());
        context.extend(self.transcript.iter().cloned());
        context.push(user_turn.clone());

        self.ui.loading = true;
        self.ui.error = None;

        tracing::debug!(
            epoch = self.epoch,
            context_turns = context.len(),
            "Inference request started"
        );

        Ok(PendingReply {
            epoch: self.epoch,
            user_turn,
            context,
        })
    }

    /// Start an exchange from the input buffer. The buffer is left intact
    /// until a reply arrives.
    pub fn submit_input(&mut self) -> Result<PendingReply, ChatError> {
        let text = self.input.clone();
        self.begin_request(&text)
    }

    /// Apply the result of a request started with `begin_request`.
    ///
    /// Success appends the user and model turns together; failure appends
    /// neither. A reply for a session that is no longer active is dropped.
    pub fn complete_request(
        &mut self,
        pending: PendingReply,
        result: Result<String, InferenceError>,
    ) -> ReplyOutcome {
        self.ui.loading = false;

        if pending.epoch != self.epoch {
            tracing::info!(
                request_epoch = pending.epoch,
                current_epoch = self.epoch,
                "Discarding reply for inactive session"
            );
            return ReplyOutcome::Discarded;
        }

        match result {
            Ok(reply) if reply.is_empty() => {
                tracing::info!("Model returned no text");
                ReplyOutcome::Empty
            }
            Ok(reply) => {
                self.transcript.push(pending.user_turn);
                self.transcript.push(Turn::model(reply.clone()));
                self.input.clear();
                tracing::debug!(turns = self.transcript.len(), "Exchange recorded");
                ReplyOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Exchange failed");
                self.ui.error = Some(GENERIC_ERROR_MESSAGE.to_string());
                ReplyOutcome::Failed
            }
        }
    }

    // -- Saved sessions --

    /// Snapshot the transcript to the front of the saved list, evicting the
    /// oldest entry beyond capacity.
    pub fn save_current_session(&mut self) -> &SavedSession {
        let session = SavedSession::snapshot(&self.transcript);
        tracing::info!(
            session_id = %session.id(),
            turns = session.transcript().len(),
            "Chat saved"
        );
        self.saved.push_front(session);
        while self.saved.len() > self.max_saved {
            if let Some(evicted) = self.saved.pop_back() {
                tracing::debug!(session_id = %evicted.id(), "Oldest saved chat evicted");
            }
        }
        &self.saved[0]
    }

    /// Replace the transcript with a copy of saved session `index`.
    pub fn select_session(&mut self, index: usize) -> Result<(), ChatError> {
        let session = self
            .saved
            .get(index)
            .ok_or(ChatError::SessionIndexOutOfRange {
                index,
                len: self.saved.len(),
            })?;
        self.transcript = session.transcript().clone();
        self.ui.error = None;
        self.epoch += 1;
        tracing::info!(session_id = %session.id(), "Saved chat opened");
        Ok(())
    }

    /// Discard the transcript and input buffer. Saved sessions are kept.
    pub fn start_new_session(&mut self) {
        self.transcript.clear();
        self.input.clear();
        self.ui.error = None;
        self.epoch += 1;
        tracing::info!(epoch = self.epoch, "New chat started");
    }

    /// Remove saved session `index`. Out-of-range indices leave the list unchanged.
    pub fn remove_session(&mut self, index: usize) -> Result<SavedSession, ChatError> {
        let len = self.saved.len();
        let removed = self
            .saved
            .remove(index)
            .ok_or(ChatError::SessionIndexOutOfRange { index, len })?;
        tracing::info!(session_id = %removed.id(), "Saved chat removed");
        Ok(removed)
    }

    // -- UI flags --

    pub(crate) fn set_speaking(&mut self, speaking: bool) {
        self.ui.speaking = speaking;
    }

    pub(crate) fn set_sidebar_open(&mut self, open: bool) {
        self.ui.sidebar_open = open;
    }
}

// =============================================================================
// Tests
// =============================================================================
