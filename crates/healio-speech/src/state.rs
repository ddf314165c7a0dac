//! Speech playback states.
//!
//! - Idle -> Speaking (playback started)
//! - Speaking -> Idle (stopped by the user, finished, or stopped externally)

use std::fmt;

/// Playback state of the speech adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpeechState {
    /// Nothing is playing.
    #[default]
    Idle,
    /// An utterance started by this adapter is playing.
    Speaking,
}

impl fmt::Display for SpeechState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechState::Idle => write!(f, "Idle"),
            SpeechState::Speaking => write!(f, "Speaking"),
        }
    }
}

impl SpeechState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SpeechState) -> bool {
        matches!(
            (self, target),
            (SpeechState::Idle, SpeechState::Speaking) | (SpeechState::Speaking, SpeechState::Idle)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SpeechState::Idle.to_string(), "Idle");
        assert_eq!(SpeechState::Speaking.to_string(), "Speaking");
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SpeechState::default(), SpeechState::Idle);
    }

    #[test]
    fn test_transitions() {
        assert!(SpeechState::Idle.can_transition_to(&SpeechState::Speaking));
        assert!(SpeechState::Speaking.can_transition_to(&SpeechState::Idle));
        assert!(!SpeechState::Idle.can_transition_to(&SpeechState::Idle));
        assert!(!SpeechState::Speaking.can_transition_to(&SpeechState::Speaking));
    }
}
