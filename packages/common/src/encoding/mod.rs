//! Text encodings used by JOSE objects and keys

pub mod base64url;
pub mod hex;
pub mod json;
