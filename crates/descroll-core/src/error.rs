//! Core error types for descroll-core.
//!
//! This module defines the error hierarchy using thiserror. State errors are
//! always recoverable by correcting call order; validation errors are rejected
//! at the boundary rather than silently clamped.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for descroll-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Call-order errors (recoverable by the caller)
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Invalid input rejected at the boundary
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors surfaced by the record-store collaborator
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Invalid-state errors.
///
/// Every variant maps to a call made in the wrong order; re-issuing the call
/// once the engine is in the expected state succeeds.
#[derive(Error, Debug)]
pub enum StateError {
    /// `start()` called while a session is already open
    #[error("a session is already being tracked")]
    AlreadyActive,

    /// `end()` (or another session-scoped call) issued with no open session
    #[error("no session is currently being tracked")]
    NoActiveSession,

    /// `dismiss()` called before the intervention became eligible
    #[error("intervention is not dismissible in its current state")]
    NotDismissible,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Value outside its permitted range
    #[error("Value for '{field}' out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
