//! Domain error types
//!
//! This module defines the error hierarchy for Ledgerlift.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Ledgerlift error type
///
/// This is the primary error type used throughout the application.
/// Each variant maps to one failure class of the migration protocol.
#[derive(Debug, Error)]
pub enum LiftError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Relational source errors (connection, query, row decoding)
    #[error("Source error: {0}")]
    Source(String),

    /// Document sink errors (transaction, insert, commit)
    #[error("Sink error: {0}")]
    Sink(String),

    /// The batch was committed but the checkpoint could not be persisted
    #[error("Checkpoint save failed: {0}")]
    CheckpointSave(String),

    /// Row transformation errors
    #[error("Transform error: {0}")]
    Transform(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl LiftError {
    /// Process exit code for this error class
    ///
    /// `2` configuration, `3` checkpoint save, `4` connection, `5` everything
    /// else that aborts a run.
    pub fn exit_code(&self) -> i32 {
        match self {
            LiftError::Configuration(_) | LiftError::Validation(_) => 2,
            LiftError::CheckpointSave(_) => 3,
            LiftError::Connection(_) => 4,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LiftError {
    fn from(err: std::io::Error) -> Self {
        LiftError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LiftError {
    fn from(err: serde_json::Error) -> Self {
        LiftError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LiftError {
    fn from(err: toml::de::Error) -> Self {
        LiftError::Configuration(format!("TOML parse error: {err}"))
    }
}
