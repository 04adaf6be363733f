//! JOSE objects and the editable original/modified pair

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{JoseError, Result};
use crate::header::Header;
use crate::jwe::Jwe;
use crate::jws::Jws;
use crate::segment::Base64Segment;

/// Either kind of compact JOSE object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoseObject {
    /// Signed object
    Jws(Jws),
    /// Encrypted object
    Jwe(Jwe),
}

impl JoseObject {
    /// Parse compact serialization: 3 segments make a JWS, 5 make a JWE
    pub fn parse(text: &str) -> Result<Self> {
        let segments = split_segments(text)?;
        match <[Base64Segment; 3]>::try_from(segments) {
            Ok([header, payload, signature]) => Ok(JoseObject::Jws(Jws::from_segments(
                header, payload, signature,
            ))),
            Err(segments) => match <[Base64Segment; 5]>::try_from(segments) {
                Ok([header, encrypted_key, iv, ciphertext, tag]) => Ok(JoseObject::Jwe(
                    Jwe::from_segments(header, encrypted_key, iv, ciphertext, tag),
                )),
                Err(segments) => Err(JoseError::parse(format!(
                    "unexpected segment count {}",
                    segments.len()
                ))),
            },
        }
    }

    /// Protected header
    #[must_use]
    pub fn header(&self) -> &Header {
        match self {
            JoseObject::Jws(jws) => jws.header(),
            JoseObject::Jwe(jwe) => jwe.header(),
        }
    }

    /// Compact serialization from the stored segments
    #[must_use]
    pub fn serialize(&self) -> String {
        match self {
            JoseObject::Jws(jws) => jws.serialize(),
            JoseObject::Jwe(jwe) => jwe.serialize(),
        }
    }

    /// The JWS, if this is one
    #[must_use]
    pub fn as_jws(&self) -> Option<&Jws> {
        match self {
            JoseObject::Jws(jws) => Some(jws),
            JoseObject::Jwe(_) => None,
        }
    }

    /// The JWE, if this is one
    #[must_use]
    pub fn as_jwe(&self) -> Option<&Jwe> {
        match self {
            JoseObject::Jwe(jwe) => Some(jwe),
            JoseObject::Jws(_) => None,
        }
    }
}

impl fmt::Display for JoseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for JoseObject {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Jws> for JoseObject {
    fn from(jws: Jws) -> Self {
        JoseObject::Jws(jws)
    }
}

impl From<Jwe> for JoseObject {
    fn from(jwe: Jwe) -> Self {
        JoseObject::Jwe(jwe)
    }
}

/// Parse compact serialization into a [`JoseObject`]
pub fn parse(text: &str) -> Result<JoseObject> {
    JoseObject::parse(text)
}

/// Split and decode the segments shared by every compact object
///
/// Only 3 or 5 segments are accepted, every segment must be base64url, the
/// segments may not all be empty and the header must decode to JSON.
pub(crate) fn split_segments(text: &str) -> Result<Vec<Base64Segment>> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 3 && parts.len() != 5 {
        debug!(segments = parts.len(), "rejecting compact object");
        return Err(JoseError::parse(format!(
            "expected 3 or 5 segments, found {}",
            parts.len()
        )));
    }

    let segments = parts
        .into_iter()
        .map(|part| {
            Base64Segment::parse(part).map_err(|e| JoseError::parse(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    if segments.iter().all(Base64Segment::is_empty) {
        return Err(JoseError::parse("all sections empty"));
    }

    serde_json::from_slice::<serde_json::Value>(segments[0].decoded())
        .map_err(|e| JoseError::parse(format!("header is not JSON: {e}")))?;

    Ok(segments)
}

/// An object as received alongside its working copy
///
/// The original is never changed; the working copy starts equal to it and
/// is replaced wholesale by edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableJoseObject {
    original: JoseObject,
    modified: JoseObject,
}

impl MutableJoseObject {
    /// Start with an unmodified working copy
    #[must_use]
    pub fn new(original: JoseObject) -> Self {
        Self {
            modified: original.clone(),
            original,
        }
    }

    /// Object as received
    #[must_use]
    pub fn original(&self) -> &JoseObject {
        &self.original
    }

    /// Current working copy
    #[must_use]
    pub fn modified(&self) -> &JoseObject {
        &self.modified
    }

    /// Replace the working copy
    pub fn set_modified(&mut self, modified: impl Into<JoseObject>) {
        self.modified = modified.into();
    }

    /// Discard edits
    pub fn reset(&mut self) {
        self.modified = self.original.clone();
    }

    /// Whether the working copy serializes differently from the original
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.original.serialize() != self.modified.serialize()
    }
}
