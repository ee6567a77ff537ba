//! Error types for console registration and dispatch

use crate::cache::CacheError;
use crate::console::TokenizeError;

/// Error type for console operations
///
/// Nothing in here is fatal. Every variant is logged at the point of
/// detection and handed back so callers can decide whether to care.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A command or variable with this name is already registered
    #[error("Console entry '{0}' is already registered")]
    DuplicateName(String),

    /// Write rejected by a CHEAT or READONLY flag
    #[error("Cannot modify '{name}': {reason}")]
    AccessDenied {
        /// Entry name
        name: String,
        /// Human readable reason
        reason: &'static str,
    },

    /// No command or variable with this name
    #[error("Unknown command or variable: {0}")]
    UnknownEntry(String),

    /// The process-wide console has not been initialized
    #[error("Console not initialized")]
    NotInitialized,

    /// The process-wide console was already initialized
    #[error("Console already initialized")]
    AlreadyInitialized,

    /// Console input could not be tokenized
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Settings cache I/O failed
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
