//! Layered error definitions
//!
//! Categorized by source: config / store / binding

use thiserror::Error;

/// Configuration errors (parse + validation)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration parse error
    #[error("config parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    Validation { field: String, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create configuration parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Record store errors
///
/// Open failures are reported, never fatal: a store that failed to open
/// stays at capacity 0 and the caller decides whether to retry. Range
/// errors are reported, never silently clamped.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing source could not be read or parsed
    #[error("source unreachable at '{location}': {message}")]
    SourceUnreachable { location: String, message: String },

    /// Named collection missing from the source
    #[error("collection '{collection}' not found in '{location}'")]
    CollectionNotFound {
        location: String,
        collection: String,
    },

    /// Position outside `[0, capacity)`
    #[error("position {position} out of range [0, {capacity})")]
    OutOfRange { position: i64, capacity: i64 },

    /// Field payload at a valid position failed to deserialize
    #[error("field '{field}' at position {position} failed to decode: {message}")]
    FieldDecode {
        field: String,
        position: i64,
        message: String,
    },
}

impl StoreError {
    /// Create source unreachable error
    pub fn source_unreachable(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnreachable {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create collection not found error
    pub fn collection_not_found(
        location: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self::CollectionNotFound {
            location: location.into(),
            collection: collection.into(),
        }
    }

    /// Create out of range error
    pub fn out_of_range(position: i64, capacity: i64) -> Self {
        Self::OutOfRange { position, capacity }
    }

    /// Create field decode error
    pub fn field_decode(field: impl Into<String>, position: i64, message: impl Into<String>) -> Self {
        Self::FieldDecode {
            field: field.into(),
            position,
            message: message.into(),
        }
    }
}

/// Transport binding errors
#[derive(Debug, Error)]
pub enum BindingError {
    /// Dispatch invoked before all three transport capabilities were bound
    #[error("transport capability '{name}' not bound before dispatch")]
    UnboundCallback { name: &'static str },
}

impl BindingError {
    /// Create unbound callback error for the named capability
    pub fn unbound(name: &'static str) -> Self {
        Self::UnboundCallback { name }
    }
}
