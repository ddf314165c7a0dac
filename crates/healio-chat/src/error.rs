//! Error types for the conversation store and sidebar.

use healio_core::error::HealioError;

/// Errors from chat operations. None of these mutate state.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a reply is already being generated")]
    RequestInFlight,
    #[error("close the sidebar before sending a message")]
    SidebarOpen,
    #[error("no saved chat at index {index} (have {len})")]
    SessionIndexOutOfRange { index: usize, len: usize },
    #[error("no message at index {index} (have {len})")]
    TurnIndexOutOfRange { index: usize, len: usize },
    #[error("no removal is waiting for confirmation")]
    NoPendingRemoval,
}

impl From<ChatError> for HealioError {
    fn from(err: ChatError) -> Self {
        HealioError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::RequestInFlight.to_string(),
            "a reply is already being generated"
        );
        assert_eq!(
            ChatError::SidebarOpen.to_string(),
            "close the sidebar before sending a message"
        );
        assert_eq!(
            ChatError::SessionIndexOutOfRange { index: 7, len: 5 }.to_string(),
            "no saved chat at index 7 (have 5)"
        );
        assert_eq!(
            ChatError::TurnIndexOutOfRange { index: 3, len: 0 }.to_string(),
            "no message at index 3 (have 0)"
        );
        assert_eq!(
            ChatError::NoPendingRemoval.to_string(),
            "no removal is waiting for confirmation"
        );
    }

    #[test]
    fn test_chat_error_into_healio_error() {
        let err: HealioError = ChatError::RequestInFlight.into();
        assert!(matches!(err, HealioError::Chat(_)));
        assert!(err.to_string().contains("already being generated"));
    }
}
