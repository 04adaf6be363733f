//! JSON Web Signature objects

use std::fmt;
use std::str::FromStr;

use crate::claims::JwsClaims;
use crate::error::{JoseError, Result};
use crate::header::Header;
use crate::object::split_segments;
use crate::segment::Base64Segment;

/// A JWS in compact serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jws {
    header: Header,
    claims: JwsClaims,
    signature: Base64Segment,
}

impl Jws {
    /// Parse `header.payload.signature`
    pub fn parse(compact: &str) -> Result<Self> {
        let segments = split_segments(compact)?;
        match <[Base64Segment; 3]>::try_from(segments) {
            Ok([header, payload, signature]) => Ok(Self::from_segments(header, payload, signature)),
            Err(segments) => Err(JoseError::parse(format!(
                "JWS requires 3 segments, found {}",
                segments.len()
            ))),
        }
    }

    /// Build from three raw base64url segments
    pub fn from_parts(header: &str, payload: &str, signature: &str) -> Result<Self> {
        Ok(Self::from_segments(
            Base64Segment::parse(header)?,
            Base64Segment::parse(payload)?,
            Base64Segment::parse(signature)?,
        ))
    }

    pub(crate) fn from_segments(
        header: Base64Segment,
        payload: Base64Segment,
        signature: Base64Segment,
    ) -> Self {
        Self {
            header: Header::new(header),
            claims: JwsClaims::new(payload),
            signature,
        }
    }

    /// Protected header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Payload
    #[must_use]
    pub fn claims(&self) -> &JwsClaims {
        &self.claims
    }

    /// Signature segment
    #[must_use]
    pub fn signature(&self) -> &Base64Segment {
        &self.signature
    }

    /// `header.payload`, the bytes covered by the signature
    #[must_use]
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header.encoded(), self.claims.encoded())
    }

    /// Compact serialization from the stored segments
    #[must_use]
    pub fn serialize(&self) -> String {
        format!("{}.{}", self.signing_input(), self.signature.encoded())
    }
}

impl fmt::Display for Jws {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for Jws {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
