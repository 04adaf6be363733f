//! Lenient URL-safe base64
//!
//! Encoding never pads. Decoding accepts padded and unpadded input and
//! tolerates non-zero trailing bits, which tokens seen in the wild carry.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::{EncodingError, Result};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode bytes as unpadded base64url
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text
pub fn decode(text: &str) -> Result<Vec<u8>> {
    LENIENT
        .decode(text)
        .map_err(|e| EncodingError::base64(e.to_string()))
}

/// Decode base64url text that must hold UTF-8
pub fn decode_to_string(text: &str) -> Result<String> {
    String::from_utf8(decode(text)?).map_err(|e| EncodingError::InvalidUtf8(e.to_string()))
}

/// Check whether text decodes as base64url
#[must_use]
pub fn is_valid(text: &str) -> bool {
    decode(text).is_ok()
}
