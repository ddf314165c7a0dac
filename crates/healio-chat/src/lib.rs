//! Conversation state for the Healio client.
//!
//! Holds the active transcript, the saved-chat list and the UI flags derived
//! from them, and wires them to the inference client and speech adapter.

pub mod error;
pub mod orchestrator;
pub mod priming;
pub mod sidebar;
pub mod store;

pub use error::ChatError;
pub use orchestrator::ChatOrchestrator;
pub use priming::default_priming;
pub use sidebar::{ConfirmChoice, PendingRemoval, RemoveOutcome, SidebarController};
pub use store::{ConversationStore, PendingReply, ReplyOutcome, GENERIC_ERROR_MESSAGE};
