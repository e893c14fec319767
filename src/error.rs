//! Error types for the BraillAI client
//!
//! Every failure the orchestrator can observe maps to one of these variants.
//! None of them is allowed to terminate the session loop: callers convert
//! them into notices via [`BraillError::user_message`].

use thiserror::Error;

/// BraillAI client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BraillError {
    /// Profile, contact or reminder lookup miss
    #[error("Not found: {0}")]
    NotFound(String),

    /// Empty required field, duplicate contact, rejected precondition
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backend-reported error or transport failure on the realtime channel
    #[error("Channel error: {0}")]
    Channel(String),

    /// HTTP request rejected, timed out or returned garbage
    #[error("Network error: {0}")]
    Network(String),

    /// Voice input or output is not available in this runtime
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Local cache could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Settings file is unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for BraillError {
    fn from(e: std::io::Error) -> Self {
        BraillError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for BraillError {
    fn from(e: serde_json::Error) -> Self {
        BraillError::Storage(e.to_string())
    }
}

impl BraillError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors are reported as a notice and the session carries on.
    /// Non-recoverable ones need the user to fix something outside the app.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BraillError::NotFound(_) => true,
            BraillError::Validation(_) => true,
            // The channel stays open after a backend error
            BraillError::Channel(_) => true,
            BraillError::Network(_) => true,
            // Never retried automatically
            BraillError::CapabilityUnavailable(_) => false,
            BraillError::Storage(_) => false,
            BraillError::Config(_) => false,
            BraillError::Io(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    pub fn user_message(&self) -> String {
        match self {
            BraillError::NotFound(what) => format!("{} not found", what),
            BraillError::Validation(reason) => reason.clone(),
            BraillError::Channel(message) => message.clone(),
            BraillError::Network(_) => {
                "Could not reach the assistant server. Please try again.".to_string()
            }
            BraillError::CapabilityUnavailable(_) => {
                "Voice input not supported. Use keyboard instead.".to_string()
            }
            BraillError::Storage(_) => "Local data could not be saved.".to_string(),
            BraillError::Config(_) => "Configuration error. Please check settings.".to_string(),
            BraillError::Io(_) => "File system error occurred.".to_string(),
        }
    }
}

/// Result type alias for BraillAI operations
pub type Result<T> = std::result::Result<T, BraillError>;
