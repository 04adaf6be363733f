//! Error types for JOSE object handling

use jwtsmith_common::EncodingError;
use jwtsmith_key::KeyError;
use thiserror::Error;

/// JOSE operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoseError {
    /// Text is not a JWS or JWE in compact serialization
    #[error("Parse error: {0}")]
    Parse(String),

    /// Signature could not be produced
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Signature could not be checked (as opposed to a wrong signature)
    #[error("Verification failed: {0}")]
    Verification(String),

    /// JWE could not be produced
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// JWE could not be opened
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Attack or search inputs are unsuitable
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Background search could not be started or joined
    #[error("Search session error: {0}")]
    Session(String),

    /// Key material error
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Encoding error
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl JoseError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a signing error
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a verification error
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    /// Create an encryption error
    pub fn encryption(msg: impl Into<String>) -> Self {
        Self::Encryption(msg.into())
    }

    /// Create a decryption error
    pub fn decryption(msg: impl Into<String>) -> Self {
        Self::Decryption(msg.into())
    }

    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}

/// Result type for JOSE operations
pub type Result<T> = std::result::Result<T, JoseError>;
