//! JSON Web Encryption objects

use std::fmt;
use std::str::FromStr;

use crate::error::{JoseError, Result};
use crate::header::Header;
use crate::object::split_segments;
use crate::segment::Base64Segment;

/// A JWE in compact serialization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jwe {
    header: Header,
    encrypted_key: Base64Segment,
    iv: Base64Segment,
    ciphertext: Base64Segment,
    tag: Base64Segment,
}

impl Jwe {
    /// Parse `header.encrypted_key.iv.ciphertext.tag`
    pub fn parse(compact: &str) -> Result<Self> {
        let segments = split_segments(compact)?;
        match <[Base64Segment; 5]>::try_from(segments) {
            Ok([header, encrypted_key, iv, ciphertext, tag]) => Ok(Self::from_segments(
                header,
                encrypted_key,
                iv,
                ciphertext,
                tag,
            )),
            Err(segments) => Err(JoseError::parse(format!(
                "JWE requires 5 segments, found {}",
                segments.len()
            ))),
        }
    }

    pub(crate) fn from_segments(
        header: Base64Segment,
        encrypted_key: Base64Segment,
        iv: Base64Segment,
        ciphertext: Base64Segment,
        tag: Base64Segment,
    ) -> Self {
        Self {
            header: Header::new(header),
            encrypted_key,
            iv,
            ciphertext,
            tag,
        }
    }

    /// Protected header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Encrypted content encryption key, empty for `dir` and ECDH-ES direct
    #[must_use]
    pub fn encrypted_key(&self) -> &Base64Segment {
        &self.encrypted_key
    }

    /// Initialization vector
    #[must_use]
    pub fn iv(&self) -> &Base64Segment {
        &self.iv
    }

    /// Ciphertext
    #[must_use]
    pub fn ciphertext(&self) -> &Base64Segment {
        &self.ciphertext
    }

    /// Authentication tag
    #[must_use]
    pub fn tag(&self) -> &Base64Segment {
        &self.tag
    }

    /// Compact serialization from the stored segments
    #[must_use]
    pub fn serialize(&self) -> String {
        [
            self.header.encoded(),
            self.encrypted_key.encoded(),
            self.iv.encoded(),
            self.ciphertext.encoded(),
            self.tag.encoded(),
        ]
        .join(".")
    }
}

impl fmt::Display for Jwe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for Jwe {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
