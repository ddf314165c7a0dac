//! Sidebar: the saved-chat list, its open/close animation and the
//! confirmation flow for removing a saved chat.

use std::time::{Duration, Instant};

use healio_core::config::{PlatformConfig, SidebarConfig};
use healio_core::types::SavedSession;
use uuid::Uuid;

use crate::error::ChatError;
use crate::store::ConversationStore;

pub const CONFIRM_TITLE: &str = "Confirm Removal";
pub const CONFIRM_MESSAGE: &str = "Are you sure you want to remove this chat?";

/// Answer to a removal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Cancel,
    Remove,
}

/// A removal waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    session_id: Uuid,
    requested_index: usize,
}

impl PendingRemoval {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Position of the session when the removal was requested.
    pub fn requested_index(&self) -> usize {
        self.requested_index
    }

    pub fn title(&self) -> &'static str {
        CONFIRM_TITLE
    }

    pub fn message(&self) -> &'static str {
        CONFIRM_MESSAGE
    }
}

/// Result of `confirm_and_remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(SavedSession),
    AwaitingConfirmation(PendingRemoval),
}

/// Linear width animation between two widths.
#[derive(Debug, Clone, Copy)]
struct WidthTransition {
    from: f64,
    to: f64,
    started: Instant,
}

/// Drives the sidebar. The open flag itself lives in the store's `UiState`.
#[derive(Debug)]
pub struct SidebarController {
    open_width: u32,
    duration: Duration,
    supports_native_confirm: bool,
    transition: Option<WidthTransition>,
    open: bool,
    pending: Option<PendingRemoval>,
}

impl SidebarController {
    pub fn new(config: &SidebarConfig, platform: &PlatformConfig) -> Self {
        Self {
            open_width: config.open_width,
            duration: Duration::from_millis(config.transition_ms),
            supports_native_confirm: platform.supports_native_confirm,
            transition: None,
            open: false,
            pending: None,
        }
    }

    pub fn supports_native_confirm(&self) -> bool {
        self.supports_native_confirm
    }

    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending.as_ref()
    }

    /// Open if closed, close if open. Returns the new open state.
    pub fn toggle(&mut self, store: &mut ConversationStore, now: Instant) -> bool {
        let target = !store.ui().sidebar_open;
        self.set_open(store, target, now);
        target
    }

    /// Width in pixels at `now`, following the most recent transition.
    pub fn width_at(&self, now: Instant) -> f64 {
        let target = if self.open { self.open_width as f64 } else { 0.0 };
        let Some(t) = self.transition else {
            return target;
        };
        if self.duration.is_zero() {
            return t.to;
        }
        let elapsed = now.saturating_duration_since(t.started);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        t.from + (t.to - t.from) * progress
    }

    /// Whether a transition is still running at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition
            .is_some_and(|t| now.saturating_duration_since(t.started) < self.duration)
    }

    /// Open saved chat `index` and close the sidebar.
    pub fn select(
        &mut self,
        store: &mut ConversationStore,
        index: usize,
        now: Instant,
    ) -> Result<(), ChatError> {
        store.select_session(index)?;
        self.set_open(store, false, now);
        Ok(())
    }

    /// Start a new chat and close the sidebar.
    pub fn new_chat(&mut self, store: &mut ConversationStore, now: Instant) {
        store.start_new_session();
        self.set_open(store, false, now);
    }

    /// Remove saved chat `index`, asking first when the platform can.
    ///
    /// A second request replaces any removal still waiting for an answer.
    pub fn confirm_and_remove(
        &mut self,
        store: &mut ConversationStore,
        index: usize,
    ) -> Result<RemoveOutcome, ChatError> {
        if !self.supports_native_confirm {
            return store.remove_session(index).map(RemoveOutcome::Removed);
        }

        let session = store
            .saved_session(index)
            .ok_or(ChatError::SessionIndexOutOfRange {
                index,
                len: store.saved_len(),
            })?;
        let pending = PendingRemoval {
            session_id: session.id(),
            requested_index: index,
        };
        tracing::debug!(session_id = %pending.session_id, index, "Removal awaiting confirmation");
        self.pending = Some(pending.clone());
        Ok(RemoveOutcome::AwaitingConfirmation(pending))
    }

    /// Answer the pending removal.
    ///
    /// Returns the removed session, or `None` when cancelled or when the
    /// session is no longer in the list.
    pub fn resolve_removal(
        &mut self,
        store: &mut ConversationStore,
        choice: ConfirmChoice,
    ) -> Result<Option<SavedSession>, ChatError> {
        let pending = self.pending.take().ok_or(ChatError::NoPendingRemoval)?;
        match choice {
            ConfirmChoice::Cancel => {
                tracing::debug!(session_id = %pending.session_id, "Removal cancelled");
                Ok(None)
            }
            ConfirmChoice::Remove => match store.position_of(pending.session_id) {
                Some(index) => store.remove_session(index).map(Some),
                None => {
                    tracing::info!(session_id = %pending.session_id, "Chat to remove is already gone");
                    Ok(None)
                }
            },
        }
    }

    fn set_open(&mut self, store: &mut ConversationStore, open: bool, now: Instant) {
        if self.open == open && store.ui().sidebar_open == open {
            return;
        }
        let from = self.width_at(now);
        self.open = open;
        self.transition = Some(WidthTransition {
            from,
            to: if open { self.open_width as f64 } else { 0.0 },
            started: now,
        });
        store.set_sidebar_open(open);
        tracing::debug!(open, "Sidebar toggled");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sidebar(native_confirm: bool) -> SidebarController {
        SidebarController::new(
            &SidebarConfig::default(),
            &PlatformConfig {
                supports_native_confirm: native_confirm,
            },
        )
    }

    fn store_with_saved(count: usize) -> ConversationStore {
        let mut store = ConversationStore::default();
        for i in 0..count {
            store.start_new_session();
            store.append_user_turn(&format!("chat {i}")).unwrap();
            store.save_current_session();
        }
        store.start_new_session();
        store
    }

    fn ids(store: &ConversationStore) -> Vec<Uuid> {
        store.saved_sessions().map(SavedSession::id).collect()
    }

    // ---- toggle / animation ----

    #[test]
    fn test_toggle_flips_open_flag() {
        let mut sidebar = make_sidebar(true);
        let mut store = ConversationStore::default();
        let now = Instant::now();

        assert!(sidebar.toggle(&mut store, now));
        assert!(store.ui().sidebar_open);
        assert!(!sidebar.toggle(&mut store, now));
        assert!(!store.ui().sidebar_open);
    }

    #[test]
    fn test_width_transition_is_linear() {
        let mut sidebar = make_sidebar(true);
        let mut store = ConversationStore::default();
        let start = Instant::now();

        assert_eq!(sidebar.width_at(start), 0.0);
        sidebar.toggle(&mut store, start);

        assert_eq!(sidebar.width_at(start), 0.0);
        let mid = sidebar.width_at(start + Duration::from_millis(150));
        assert!((mid - 100.0).abs() < 1e-6);
        assert_eq!(sidebar.width_at(start + Duration::from_millis(300)), 200.0);
        assert_eq!(sidebar.width_at(start + Duration::from_secs(5)), 200.0);
        assert!(sidebar.is_animating(start + Duration::from_millis(299)));
        assert!(!sidebar.is_animating(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_close_mid_animation_starts_from_current_width() {
        let mut sidebar = make_sidebar(true);
        let mut store = ConversationStore::default();
        let start = Instant::now();

        sidebar.toggle(&mut store, start);
        let halfway = start + Duration::from_millis(150);
        sidebar.toggle(&mut store, halfway);

        assert!((sidebar.width_at(halfway) - 100.0).abs() < 1e-6);
        assert_eq!(sidebar.width_at(halfway + Duration::from_millis(300)), 0.0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let config = SidebarConfig {
            transition_ms: 0,
            ..SidebarConfig::default()
        };
        let mut sidebar = SidebarController::new(&config, &PlatformConfig::default());
        let mut store = ConversationStore::default();
        let now = Instant::now();

        sidebar.toggle(&mut store, now);
        assert_eq!(sidebar.width_at(now), 200.0);
    }

    #[test]
    fn test_open_sidebar_blocks_sending() {
        let mut sidebar = make_sidebar(true);
        let mut store = ConversationStore::default();
        sidebar.toggle(&mut store, Instant::now());

        assert!(!store.ui().can_send());
        assert!(matches!(store.begin_request("hi"), Err(ChatError::SidebarOpen)));
    }

    // ---- select / new chat ----

    #[test]
    fn test_select_closes_sidebar() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(2);
        let now = Instant::now();
        sidebar.toggle(&mut store, now);

        sidebar.select(&mut store, 1, now).unwrap();

        assert!(!store.ui().sidebar_open);
        assert_eq!(store.transcript().get(0).unwrap().text(), "chat 0");
    }

    #[test]
    fn test_select_invalid_index_keeps_sidebar_open() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(1);
        let now = Instant::now();
        sidebar.toggle(&mut store, now);

        assert!(sidebar.select(&mut store, 3, now).is_err());
        assert!(store.ui().sidebar_open);
    }

    #[test]
    fn test_new_chat_closes_sidebar() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(1);
        store.append_user_turn("draft").unwrap();
        let now = Instant::now();
        sidebar.toggle(&mut store, now);

        sidebar.new_chat(&mut store, now);

        assert!(!store.ui().sidebar_open);
        assert!(store.transcript().is_empty());
        assert_eq!(store.saved_len(), 1);
    }

    // ---- removal ----

    #[test]
    fn test_remove_without_native_confirm_is_immediate() {
        let mut sidebar = make_sidebar(false);
        let mut store = store_with_saved(4);
        let target = store.saved_session(2).unwrap().id();

        let outcome = sidebar.confirm_and_remove(&mut store, 2).unwrap();

        assert!(matches!(outcome, RemoveOutcome::Removed(ref s) if s.id() == target));
        assert_eq!(store.saved_len(), 3);
        assert!(sidebar.pending_removal().is_none());
    }

    #[test]
    fn test_remove_with_native_confirm_waits_for_answer() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(4);
        let target = store.saved_session(2).unwrap().id();

        let outcome = sidebar.confirm_and_remove(&mut store, 2).unwrap();
        let RemoveOutcome::AwaitingConfirmation(pending) = outcome else {
            panic!("expected a confirmation prompt");
        };
        assert_eq!(pending.title(), "Confirm Removal");
        assert_eq!(pending.message(), "Are you sure you want to remove this chat?");
        assert_eq!(pending.requested_index(), 2);
        assert_eq!(store.saved_len(), 4);

        let removed = sidebar
            .resolve_removal(&mut store, ConfirmChoice::Remove)
            .unwrap()
            .unwrap();
        assert_eq!(removed.id(), target);
        assert_eq!(store.saved_len(), 3);
    }

    #[test]
    fn test_cancel_keeps_session() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(3);
        let before = ids(&store);

        sidebar.confirm_and_remove(&mut store, 0).unwrap();
        let removed = sidebar.resolve_removal(&mut store, ConfirmChoice::Cancel).unwrap();

        assert!(removed.is_none());
        assert_eq!(ids(&store), before);
        assert!(sidebar.pending_removal().is_none());
    }

    #[test]
    fn test_confirmed_removal_follows_session_after_list_shifts() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(3);
        let target = store.saved_session(2).unwrap().id();

        sidebar.confirm_and_remove(&mut store, 2).unwrap();
        // A save while the prompt is up pushes the target to index 3.
        store.save_current_session();
        sidebar.resolve_removal(&mut store, ConfirmChoice::Remove).unwrap();

        assert!(store.position_of(target).is_none());
        assert_eq!(store.saved_len(), 3);
    }

    #[test]
    fn test_confirmed_removal_of_evicted_session_is_noop() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(5);
        sidebar.confirm_and_remove(&mut store, 4).unwrap();
        store.save_current_session();
        let before = ids(&store);

        let removed = sidebar.resolve_removal(&mut store, ConfirmChoice::Remove).unwrap();

        assert!(removed.is_none());
        assert_eq!(ids(&store), before);
    }

    #[test]
    fn test_invalid_index_never_corrupts_list() {
        for native in [true, false] {
            let mut sidebar = make_sidebar(native);
            let mut store = store_with_saved(2);
            let before = ids(&store);

            let err = sidebar.confirm_and_remove(&mut store, 5).unwrap_err();
            assert!(matches!(
                err,
                ChatError::SessionIndexOutOfRange { index: 5, len: 2 }
            ));
            assert_eq!(ids(&store), before);
            assert!(sidebar.pending_removal().is_none());
        }
    }

    #[test]
    fn test_resolve_without_pending_is_error() {
        let mut sidebar = make_sidebar(true);
        let mut store = store_with_saved(1);
        assert!(matches!(
            sidebar.resolve_removal(&mut store, ConfirmChoice::Remove),
            Err(ChatError::NoPendingRemoval)
        ));
        assert_eq!(store.saved_len(), 1);
    }
}
