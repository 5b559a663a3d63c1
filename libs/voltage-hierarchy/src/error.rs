//! Hierarchy Error Types
//!
//! Only the I/O-facing parts of the crate (snapshot loading) return these.
//! Validation, classification and forest assembly report their outcomes as
//! plain values.

use thiserror::Error;

/// Result type for voltage-hierarchy operations
pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Hierarchy layer errors
#[derive(Debug, Error, Clone)]
pub enum HierarchyError {
    /// Snapshot file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Snapshot content could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot file extension is not json/yaml/yml
    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    /// Snapshot decoded but contains unusable records
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl From<std::io::Error> for HierarchyError {
    fn from(err: std::io::Error) -> Self {
        HierarchyError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HierarchyError {
    fn from(err: serde_json::Error) -> Self {
        HierarchyError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for HierarchyError {
    fn from(err: serde_yaml::Error) -> Self {
        HierarchyError::Serialization(err.to_string())
    }
}

// Helper methods
impl HierarchyError {
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        HierarchyError::UnsupportedFormat(msg.into())
    }

    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        HierarchyError::InvalidSnapshot(msg.into())
    }
}
