//! Encoding error types

use thiserror::Error;

/// Errors raised by the encoding helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Text is not valid base64url
    #[error("Invalid base64url: {0}")]
    InvalidBase64Url(String),

    /// Text is not valid hexadecimal
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Text is not a JSON object or array
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Bytes are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(String),
}

impl EncodingError {
    /// Create an invalid base64url error
    pub fn base64(msg: impl Into<String>) -> Self {
        Self::InvalidBase64Url(msg.into())
    }

    /// Create an invalid JSON error
    pub fn json(msg: impl Into<String>) -> Self {
        Self::InvalidJson(msg.into())
    }
}

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, EncodingError>;
