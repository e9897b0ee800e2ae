//! Error types for ShardKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ShardError
pub type Result<T> = std::result::Result<T, ShardError>;

/// Unified error type for ShardKV operations
#[derive(Debug, Error)]
pub enum ShardError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("missing key: `{0}`")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("key too long: {len} > {max}")]
    KeyTooLong { len: usize, max: usize },

    #[error("encoded value too long: {len} > {max}")]
    ValueTooLong { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("timed out after {waited_ms}ms waiting for partition {partition} lock")]
    LockTimeout { partition: usize, waited_ms: u64 },
}

impl From<serde_json::Error> for ShardError {
    fn from(err: serde_json::Error) -> Self {
        ShardError::Serialization(err.to_string())
    }
}

impl ShardError {
    /// True if this is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShardError::KeyNotFound(_))
    }

    /// True if the put was rejected by a size limit before any mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShardError::KeyTooLong { .. } | ShardError::ValueTooLong { .. }
        )
    }
}
