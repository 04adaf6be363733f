//! Locate compact JOSE objects inside arbitrary text
//!
//! Candidates are found with a single pattern that prefers the five segment
//! JWE shape over the three segment JWS shape at each position. A candidate
//! is only reported when it parses and its header looks like a real JOSE
//! header, which filters out dotted text such as host names.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use jwtsmith_key::JweAlgorithm;
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::object::JoseObject;

const B64: &str = "[A-Za-z0-9_-]";

static JOSE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let jwe = format!(r"e{B64}*\.{B64}*\.{B64}+\.{B64}+\.{B64}+");
    let jws = format!(r"e{B64}*\.{B64}+\.{B64}*");
    Regex::new(&format!("({jwe})|({jws})")).ok()
});

/// A located object with the exact text it was found as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoseObjectPair {
    /// Matched text
    pub original: String,
    /// Parsed object
    pub object: JoseObject,
}

/// Every acceptable object in `text`, deduplicated, in order of first occurrence
#[must_use]
pub fn extract_jose_objects(text: &str) -> Vec<JoseObjectPair> {
    let Some(pattern) = JOSE_PATTERN.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    pattern
        .find_iter(text)
        .map(|found| found.as_str())
        .filter(|candidate| seen.insert(*candidate))
        .filter_map(|candidate| {
            accept(candidate).map(|object| JoseObjectPair {
                original: candidate.to_owned(),
                object,
            })
        })
        .collect()
}

/// Whether `text` holds at least one acceptable object
#[must_use]
pub fn contains_jose_objects(text: &str) -> bool {
    JOSE_PATTERN.as_ref().is_some_and(|pattern| {
        pattern
            .find_iter(text)
            .any(|found| accept(found.as_str()).is_some())
    })
}

/// The object `text` consists of, when it is exactly one acceptable object
#[must_use]
pub fn parse_jose_object(text: &str) -> Option<JoseObject> {
    let pattern = JOSE_PATTERN.as_ref()?;
    let found = pattern.find(text)?;
    if found.start() != 0 || found.end() != text.len() {
        return None;
    }
    accept(text)
}

fn accept(candidate: &str) -> Option<JoseObject> {
    let object = JoseObject::parse(candidate).ok()?;
    let accepted = match &object {
        JoseObject::Jwe(jwe) => {
            let header = jwe.header();
            header.string_member("alg").is_some() && header.string_member("enc").is_some()
        }
        JoseObject::Jws(jws) => is_jws_header(jws.header().segment().decoded()),
    };
    trace!(accepted, len = candidate.len(), "JOSE candidate");
    accepted.then_some(object)
}

fn is_jws_header(decoded: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(decoded) else {
        return false;
    };
    let Ok(Value::Object(members)) = serde_json::from_str::<Value>(text) else {
        return false;
    };
    match members.get("alg") {
        Some(Value::String(alg)) => {
            !alg.trim().is_empty() && JweAlgorithm::from_str(alg).is_err()
        }
        _ => false,
    }
}
