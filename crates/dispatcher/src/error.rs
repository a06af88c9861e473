//! Dispatcher error types

use thiserror::Error;

use contracts::BindingError;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Group size must be at least 1
    #[error("group size must be positive")]
    InvalidGroupSize,

    /// A required transport capability was never registered
    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    /// Transport creation error
    #[error("failed to create transport '{name}': {message}")]
    TransportCreation { name: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a transport creation error
    pub fn transport_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransportCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
