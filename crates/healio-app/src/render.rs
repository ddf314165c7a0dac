//! Plain-text rendering of chat state for the terminal.

use healio_chat::sidebar::PendingRemoval;
use healio_chat::ConversationStore;
use healio_core::types::{Role, SavedSession, Turn, UiState};

const PREVIEW_CHARS: usize = 40;

/// One message, numbered from 1 so `/speak N` can refer to it.
pub fn turn(index: usize, turn: &Turn) -> String {
    let speaker = match turn.role() {
        Role::User => "You",
        Role::Model => "Healio",
    };
    format!("[{}] {}: {}", index + 1, speaker, turn.text())
}

/// The whole active transcript.
pub fn transcript(store: &ConversationStore) -> String {
    if store.transcript().is_empty() {
        return "(new chat)".to_string();
    }
    store
        .transcript()
        .iter()
        .enumerate()
        .map(|(i, t)| turn(i, t))
        .collect::<Vec<_>>()
        .join("\n")
}

fn saved_entry(index: usize, session: &SavedSession) -> String {
    let when = session.saved_at().to_datetime().format("%Y-%m-%d %H:%M");
    match session.preview(PREVIEW_CHARS) {
        Some(preview) => format!("Chat {}  ({})  {}", index + 1, when, preview),
        None => format!("Chat {}  ({})", index + 1, when),
    }
}

/// Saved chats, labelled "Chat 1" for the most recent.
pub fn saved_list(store: &ConversationStore) -> String {
    if store.saved_len() == 0 {
        return "No saved chats.".to_string();
    }
    store
        .saved_sessions()
        .enumerate()
        .map(|(i, s)| saved_entry(i, s))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn confirmation(pending: &PendingRemoval) -> String {
    format!(
        "{}: {} (Chat {})\n  /yes to Remove, /no to Cancel",
        pending.title(),
        pending.message(),
        pending.requested_index() + 1
    )
}

/// Status line shown after each command, if anything needs saying.
pub fn status(ui: &UiState) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(ref error) = ui.error {
        parts.push(error.clone());
    }
    if ui.loading {
        parts.push("Thinking…".to_string());
    }
    if ui.speaking {
        parts.push("Speaking (/speak N to stop)".to_string());
    }
    if ui.sidebar_open {
        parts.push("Sidebar open: /open N, /remove N, /new or /sidebar to close".to_string());
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
