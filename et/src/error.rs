//! Tracker error types

use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by catalog, scheduler and state operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Category with name '{0}' already exists")]
    DuplicateName(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Protected entity: {0}")]
    ProtectedEntity(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("State channel closed")]
    ChannelClosed,
}

/// Result alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a not-found error for a category
    pub fn category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Category",
            id: id.into(),
        }
    }

    /// Build a not-found error for an item
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Item",
            id: id.into(),
        }
    }

    /// Check if the caller may retry the same operation later
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::Persistence(_) | TrackerError::ChannelClosed => true,
            TrackerError::Validation { .. }
            | TrackerError::DuplicateName(_)
            | TrackerError::NotFound { .. }
            | TrackerError::ProtectedEntity(_) => false,
        }
    }
}
