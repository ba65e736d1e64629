//! Validation error types

use std::fmt;

/// Validation error for request payloads and keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be decoded
    Body { reason: String },

    /// Path parameter could not be extracted
    Path { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::Body { reason } => write!(f, "invalid request body: {}", reason),
            Self::Path { reason } => write!(f, "invalid path: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
