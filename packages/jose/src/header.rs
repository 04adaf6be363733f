//! Protected header access

use jwtsmith_common::encoding::json;
use jwtsmith_common::EncodingError;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::segment::Base64Segment;

/// Protected header of a JWS or JWE
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    segment: Base64Segment,
}

impl Header {
    /// Wrap an already decoded segment
    #[must_use]
    pub fn new(segment: Base64Segment) -> Self {
        Self { segment }
    }

    /// Encode header JSON text as given, without reformatting it
    #[must_use]
    pub fn from_json_text(text: &str) -> Self {
        Self::new(Base64Segment::encode(text))
    }

    /// Serialize a JSON object compactly, keeping member order
    pub fn from_json(object: &Map<String, Value>) -> Result<Self> {
        let text =
            serde_json::to_string(object).map_err(|e| EncodingError::json(e.to_string()))?;
        Ok(Self::from_json_text(&text))
    }

    /// Underlying segment
    #[must_use]
    pub fn segment(&self) -> &Base64Segment {
        &self.segment
    }

    /// Encoded text as received
    #[must_use]
    pub fn encoded(&self) -> &str {
        self.segment.encoded()
    }

    /// Decoded header text
    #[must_use]
    pub fn decoded(&self) -> String {
        self.segment.decoded_text()
    }

    /// Header members, or an empty object when the header is not a JSON object
    #[must_use]
    pub fn json(&self) -> Map<String, Value> {
        match serde_json::from_slice(self.segment.decoded()) {
            Ok(Value::Object(object)) => object,
            _ => Map::new(),
        }
    }

    /// String value of a member
    #[must_use]
    pub fn string_member(&self, name: &str) -> Option<String> {
        match self.json().get(name) {
            Some(Value::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// `alg` member, empty when absent or not a string
    #[must_use]
    pub fn algorithm(&self) -> String {
        self.string_member("alg").unwrap_or_default()
    }

    /// `kid` member
    #[must_use]
    pub fn key_id(&self) -> Option<String> {
        self.string_member("kid")
    }

    /// Whether the decoded header is compact JSON
    #[must_use]
    pub fn is_compact(&self) -> bool {
        json::is_json_compact(&self.decoded())
    }

    /// Header JSON indented for display
    pub fn pretty(&self) -> Result<String> {
        Ok(json::pretty_print_json(&self.decoded())?)
    }
}
