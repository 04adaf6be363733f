//! Hexadecimal helpers

use crate::error::{EncodingError, Result};

/// Encode bytes as upper case hex
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode_upper(bytes)
}

/// Decode hex text, either case
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    ::hex::decode(text).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}
