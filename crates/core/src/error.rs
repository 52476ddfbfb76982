//! Common error handling utilities and conventions

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types that can be shared across crates
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, thiserror::Error)]
pub enum CoreError {
    #[error("IO operation failed: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    /// Create an IO error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
