use thiserror::Error;

/// Top-level error type for the Concierge system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// ConciergeError` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConciergeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ConciergeError {
    fn from(err: toml::de::Error) -> Self {
        ConciergeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConciergeError {
    fn from(err: toml::ser::Error) -> Self {
        ConciergeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ConciergeError {
    fn from(err: serde_json::Error) -> Self {
        ConciergeError::Serialization(err.to_string())
    }
}

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, ConciergeError>;
