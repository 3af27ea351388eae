//! Error types for the dialogue engine.

use concierge_core::error::ConciergeError;

/// Errors from the dialogue engine and its capability collaborators.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("session store error: {0}")]
    SessionStore(String),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("booking store error: {0}")]
    BookingStore(String),
    #[error("media relay error: {0}")]
    Relay(String),
    #[error("transcript error: {0}")]
    Transcript(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ConciergeError> for EngineError {
    fn from(err: ConciergeError) -> Self {
        EngineError::SessionStore(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Internal(err.to_string())
    }
}
