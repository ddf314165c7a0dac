//! Speech playback for model replies.
//!
//! Wraps an on-device text-to-speech capability behind a two-state machine
//! (Idle <-> Speaking). Completion is reported back as explicit events so the
//! caller's event loop drives every transition.

pub mod adapter;
pub mod engine;
pub mod error;
pub mod sanitize;
pub mod state;

pub use adapter::{SpeechAdapter, ToggleOutcome};
pub use engine::{
    event_channel, CommandSpeechEngine, SilentSpeechEngine, SpeechEngine, SpeechEvent,
    SpeechEventReceiver, SpeechEventSender, UtteranceId,
};
pub use error::SpeechError;
pub use sanitize::strip_for_speech;
pub use state::SpeechState;
