//! Speech adapter: the Idle/Speaking state machine around a `SpeechEngine`.

use std::sync::Arc;

use crate::engine::{SpeechEngine, SpeechEvent, SpeechEventSender, UtteranceId};
use crate::sanitize::strip_for_speech;
use crate::state::SpeechState;

/// Result of a `toggle` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Playback started for the given utterance.
    Started(UtteranceId),
    /// The adapter was speaking and has been stopped.
    Stopped,
    /// The engine was already busy with speech this adapter did not start.
    Busy,
    /// The engine failed to start; the adapter stays Idle.
    Failed,
}

/// Toggles speech playback for a piece of text.
///
/// Engine completion arrives later as a `SpeechEvent`, fed back through
/// `handle_event`. Events for any utterance other than the current one are
/// ignored, so duplicate or late completions never disturb a newer playback.
pub struct SpeechAdapter {
    engine: Arc<dyn SpeechEngine>,
    events: SpeechEventSender,
    state: SpeechState,
    current: Option<UtteranceId>,
    next_id: u64,
}

impl SpeechAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>, events: SpeechEventSender) -> Self {
        Self {
            engine,
            events,
            state: SpeechState::Idle,
            current: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn is_speaking(&self) -> bool {
        self.state == SpeechState::Speaking
    }

    /// The utterance currently playing, if any.
    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Stop if speaking, otherwise start speaking `text`.
    pub async fn toggle(&mut self, text: &str) -> ToggleOutcome {
        if self.state == SpeechState::Speaking {
            if let Err(e) = self.engine.stop().await {
                tracing::warn!(error = %e, "Speech stop failed");
            }
            self.transition(SpeechState::Idle);
            self.current = None;
            return ToggleOutcome::Stopped;
        }

        if self.engine.is_speaking().await {
            tracing::debug!("Speech engine already busy; toggle ignored");
            return ToggleOutcome::Busy;
        }

        let spoken = strip_for_speech(text);
        let id = UtteranceId(self.next_id);
        self.next_id += 1;

        match self.engine.speak(id, &spoken, self.events.clone()).await {
            Ok(()) => {
                self.current = Some(id);
                self.transition(SpeechState::Speaking);
                ToggleOutcome::Started(id)
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Speech playback failed to start");
                ToggleOutcome::Failed
            }
        }
    }

    /// Apply a completion event. Returns `true` if it moved the adapter to Idle.
    pub fn handle_event(&mut self, event: SpeechEvent) -> bool {
        if self.current != Some(event.utterance()) {
            tracing::trace!(?event, "Ignoring stale speech event");
            return false;
        }
        self.current = None;
        self.transition(SpeechState::Idle);
        true
    }

    fn transition(&mut self, target: SpeechState) {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Speech state: {} -> {}", self.state, target);
            self.state = target;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
