//! Base64url segments of compact serializations

use std::fmt;

use jwtsmith_common::encoding::base64url;

use crate::error::Result;

/// One `.`-separated part of a compact JOSE object
///
/// The encoded text is kept exactly as received so that serialization
/// reproduces the input byte for byte, including non-canonical trailing bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64Segment {
    encoded: String,
    decoded: Vec<u8>,
}

impl Base64Segment {
    /// Decode a segment, keeping the original text
    pub fn parse(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        let decoded = base64url::decode(&encoded)?;
        Ok(Self { encoded, decoded })
    }

    /// Encode bytes into a canonical segment
    pub fn encode(bytes: impl AsRef<[u8]>) -> Self {
        let decoded = bytes.as_ref().to_vec();
        Self {
            encoded: base64url::encode(&decoded),
            decoded,
        }
    }

    /// The empty segment
    #[must_use]
    pub fn empty() -> Self {
        Self {
            encoded: String::new(),
            decoded: Vec::new(),
        }
    }

    /// Encoded text as received
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Decoded bytes
    #[must_use]
    pub fn decoded(&self) -> &[u8] {
        &self.decoded
    }

    /// Decoded bytes as text, with invalid UTF-8 replaced
    #[must_use]
    pub fn decoded_text(&self) -> String {
        String::from_utf8_lossy(&self.decoded).into_owned()
    }

    /// Whether the segment decodes to no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }
}

impl fmt::Display for Base64Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
