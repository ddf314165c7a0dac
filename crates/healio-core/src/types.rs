use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Turns
// =============================================================================

/// Speaker of a turn. Serialized exactly as the remote API expects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of a conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

// =============================================================================
// Transcript
// =============================================================================

/// Ordered conversation history. Insertion order is conversation order.
///
/// Only whole-turn appends and wholesale replacement are supported; turns are
/// never edited or reordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Turn] {
        &self.0
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self(turns)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Saved sessions
// =============================================================================

/// Unix timestamp in seconds (UTC).
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

/// A value snapshot of a transcript taken when the user saved the chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    id: Uuid,
    saved_at: Timestamp,
    transcript: Transcript,
}

impl SavedSession {
    /// Snapshot `transcript`. The session owns its own copy.
    pub fn snapshot(transcript: &Transcript) -> Self {
        Self {
            id: Uuid::new_v4(),
            saved_at: Timestamp::now(),
            transcript: transcript.clone(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn saved_at(&self) -> Timestamp {
        self.saved_at
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// First user message, shortened for list display.
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let first = self
            .transcript
            .iter()
            .find(|t| t.role() == Role::User)?
            .text()
            .trim();
        if first.chars().count() <= max_chars {
            Some(first.to_string())
        } else {
            let cut: String = first.chars().take(max_chars).collect();
            Some(format!("{}…", cut.trim_end()))
        }
    }
}

// =============================================================================
// UI flags
// =============================================================================

/// Transient presentation flags. Recomputed by every operation, never saved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    /// An inference request is in flight.
    pub loading: bool,
    /// User-visible error from the last request, if any.
    pub error: Option<String>,
    /// Speech playback is running.
    pub speaking: bool,
    /// The saved-chat sidebar is open (chat input is hidden meanwhile).
    pub sidebar_open: bool,
}

impl UiState {
    /// Whether the chat input accepts a new message.
    pub fn can_send(&self) -> bool {
        !self.loading && !self.sidebar_open
    }
}
