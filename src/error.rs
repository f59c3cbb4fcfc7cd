//! Custom error types for storage groups
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// One serial that is already assigned to a slot of another group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConflict {
    pub serial: String,
    pub group_id: String,
    /// "Master" or "Backup N"
    pub slot: String,
    pub label: String,
}

impl fmt::Display for SerialConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "serial '{}' is already {} of group {} (label '{}')",
            self.serial, self.slot, self.group_id, self.label
        )
    }
}

fn join_conflicts(conflicts: &[SerialConflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The main error type for storage group operations
#[derive(Error, Debug)]
pub enum GroupsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A candidate serial is already assigned elsewhere
    #[error("Duplicate serial: {}", join_conflicts(.conflicts))]
    DuplicateSerial { conflicts: Vec<SerialConflict> },

    /// A prompt was reached while running non-interactively
    #[error("Input required but running non-interactively: {prompt}")]
    NonInteractive { prompt: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Host device enumeration errors
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// The drive root holding the group file is not reachable
    #[error("Storage root not available: {}", .path.display())]
    RootUnavailable { path: PathBuf },
}

impl GroupsError {
    /// Create a "not found" error for storage groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Storage group",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a duplicate serial error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateSerial { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for GroupsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GroupsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for storage group operations
pub type GroupsResult<T> = Result<T, GroupsError>;
