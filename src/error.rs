// Error types for the record store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the store and its backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Stored JSON could not be parsed, or a value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No record with this id in the table
    #[error("Record not found: {table}/{id}")]
    NotFound { table: String, id: String },

    /// Table name failed validation
    #[error("Invalid table name: {0}")]
    InvalidName(String),

    /// Caller passed an argument the operation cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Backend refused a write that would exceed its quota
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { key: String, needed: usize, quota: usize },

    /// Backend is unavailable or rejected the operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Registration with mismatched password confirmation
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Registration with a password under the minimum length
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    /// Registration with an email that already has an account
    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    /// Login with an unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
}
