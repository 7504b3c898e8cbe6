//! Chat transport error types

use thiserror::Error;

/// Transport failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Connect, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Status(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Malformed, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Unknown, message)
    }
}

/// Error classification
///
/// Every kind is handled the same way by the session (fixed failure text,
/// state untouched); the kind exists for logs and turn records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Request did not complete in time
    Timeout,
    /// Could not reach the assistant
    Connect,
    /// Assistant answered with a non-success status
    Status(u16),
    /// Body could not be read or decoded
    Malformed,
    /// Anything else
    Unknown,
}
