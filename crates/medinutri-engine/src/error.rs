//! Error types for the answer engines.

use medinutri_core::error::MediNutriError;

/// Errors from the chat engines.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("chat is disabled")]
    Disabled,
    #[error("conversation has no user message")]
    EmptyHistory,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
}

impl From<EngineError> for MediNutriError {
    fn from(err: EngineError) -> Self {
        MediNutriError::Api(err.to_string())
    }
}
