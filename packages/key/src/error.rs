//! Error handling for key construction and conversion

use std::fmt;

use jwtsmith_common::EncodingError;
use thiserror::Error;

/// Step of a PEM conversion that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PemStage {
    /// Input is not PEM, or the PEM body is not DER
    Read,
    /// An ASN.1 sequence has the wrong number of elements
    Asn1ElementCount,
    /// An ASN.1 element has an unexpected type or an unknown identifier
    TypeCast,
    /// Export to PEM failed
    Encode,
}

impl fmt::Display for PemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            PemStage::Read => "read",
            PemStage::Asn1ElementCount => "ASN.1 element count",
            PemStage::TypeCast => "type cast",
            PemStage::Encode => "encode",
        };
        f.write_str(stage)
    }
}

/// Key-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Key material the engine cannot model
    #[error("Unsupported key: {0}")]
    UnsupportedKey(String),

    /// Key material that is recognised but malformed
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// PEM import or export failed
    #[error("PEM conversion failed at {stage}: {message}")]
    PemConversion {
        /// Conversion step that failed
        stage: PemStage,
        /// Failure details
        message: String,
    },

    /// JSON key material could not be parsed
    #[error("JSON error: {0}")]
    Json(String),

    /// Base64url or hex decoding failed
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl KeyError {
    /// Create an unsupported key error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedKey(msg.into())
    }

    /// Create an invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Create a PEM conversion error for the given stage
    pub fn pem(stage: PemStage, msg: impl Into<String>) -> Self {
        Self::PemConversion {
            stage,
            message: msg.into(),
        }
    }

    /// Create a JSON error
    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    /// Stage of a failed PEM conversion, if this is one
    #[must_use]
    pub fn pem_stage(&self) -> Option<PemStage> {
        match self {
            Self::PemConversion { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for KeyError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
