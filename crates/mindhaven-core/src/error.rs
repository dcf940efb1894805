//! Error types for MindHaven

/// Result type alias using MindHaven's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for MindHaven operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request validation errors (empty or oversized messages)
    #[error("validation error: {0}")]
    Validation(String),

    /// State classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Reply generation errors
    #[error("generator error: {0}")]
    Generator(String),

    /// Conversation memory errors
    #[error("memory error: {0}")]
    Memory(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new generator error
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator(msg.into())
    }

    /// Create a new memory error
    pub fn memory(msg: impl Into<String>) -> Self {
        Self::Memory(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
