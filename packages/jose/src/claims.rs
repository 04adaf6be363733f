//! JWS payload claims and registered time claims
//!
//! The payload is either JSON or opaque text. JSON payloads expose the
//! registered `exp`, `nbf` and `iat` claims as [`TimeClaim`]s, which accept
//! epoch seconds (optionally fractional) as well as ISO-8601 date-times.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use jwtsmith_common::encoding::json;
use serde_json::Value;

use crate::segment::Base64Segment;

/// Payload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimsType {
    /// Payload is a JSON object
    Json,
    /// Payload is anything else
    Text,
}

/// Registered time claim names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeClaimType {
    /// `exp`
    ExpirationTime,
    /// `nbf`
    NotBeforeTime,
    /// `iat`
    IssuedAtTime,
}

impl TimeClaimType {
    /// All time claims in payload inspection order
    pub const ALL: [TimeClaimType; 3] = [
        TimeClaimType::ExpirationTime,
        TimeClaimType::NotBeforeTime,
        TimeClaimType::IssuedAtTime,
    ];

    /// Claim name in the payload
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TimeClaimType::ExpirationTime => "exp",
            TimeClaimType::NotBeforeTime => "nbf",
            TimeClaimType::IssuedAtTime => "iat",
        }
    }

    /// Whether `instant` satisfies this claim at `now`
    #[must_use]
    pub fn is_valid_at(self, instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            TimeClaimType::ExpirationTime => instant > now,
            TimeClaimType::NotBeforeTime | TimeClaimType::IssuedAtTime => instant < now,
        }
    }
}

impl fmt::Display for TimeClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered time claim with its raw value and, when it parses, its instant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeClaim {
    claim_type: TimeClaimType,
    value: String,
    date_time: Option<DateTime<Utc>>,
}

impl TimeClaim {
    /// Claim holding seconds since the epoch
    ///
    /// Negative or non-numeric values have no instant.
    pub fn from_epoch_seconds(claim_type: TimeClaimType, value: impl Into<String>) -> Self {
        let value = value.into();
        let date_time = parse_epoch_seconds(&value);
        Self {
            claim_type,
            value,
            date_time,
        }
    }

    /// Claim holding an ISO-8601 date-time with offset
    pub fn from_iso_date_time(claim_type: TimeClaimType, value: impl Into<String>) -> Self {
        let value = value.into();
        let date_time = DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|instant| instant.with_timezone(&Utc));
        Self {
            claim_type,
            value,
            date_time,
        }
    }

    /// Which claim this is
    #[must_use]
    pub fn claim_type(&self) -> TimeClaimType {
        self.claim_type
    }

    /// Raw claim value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parsed instant
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        self.date_time
    }

    /// Whether the value parsed to an instant
    #[must_use]
    pub fn has_date(&self) -> bool {
        self.date_time.is_some()
    }

    /// Whether the claim holds now; a claim without an instant never does
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.date_time
            .is_some_and(|instant| self.claim_type.is_valid_at(instant, Utc::now()))
    }

    /// Instant rendered in UTC, e.g. `Fri Apr 12 1985 23:20:50 GMT`
    #[must_use]
    pub fn date(&self) -> Option<String> {
        self.date_in(FixedOffset::east_opt(0)?)
    }

    /// Instant rendered at a fixed offset, e.g. `Wed Dec 31 1969 16:00:00 GMT-8`
    #[must_use]
    pub fn date_in(&self, offset: FixedOffset) -> Option<String> {
        self.date_time.map(|instant| {
            let local = instant.with_timezone(&offset);
            format!(
                "{} {}",
                local.format("%a %b %d %Y %H:%M:%S"),
                gmt_label(offset)
            )
        })
    }
}

fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let seconds: i64 = whole.parse().ok()?;
    let mut nanos: String = fraction.chars().take(9).collect();
    while nanos.len() < 9 {
        nanos.push('0');
    }

    DateTime::from_timestamp(seconds, nanos.parse().ok()?)
}

fn looks_like_epoch(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    digits(whole) && fraction.is_none_or(digits)
}

/// Localized offset label: `GMT`, `GMT-8`, `GMT+5:30`
fn gmt_label(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    if total == 0 {
        return "GMT".to_string();
    }

    let sign = if total < 0 { '-' } else { '+' };
    let hours = total.abs() / 3600;
    let minutes = total.abs() % 3600 / 60;

    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}

/// Time claims present in a JSON payload, in `exp`, `nbf`, `iat` order
#[must_use]
pub fn time_claims_from_payload(payload: &str) -> Vec<TimeClaim> {
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(payload) else {
        return Vec::new();
    };

    TimeClaimType::ALL
        .into_iter()
        .filter_map(|claim_type| {
            let value = match object.get(claim_type.name())? {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };

            Some(if looks_like_epoch(&value) {
                TimeClaim::from_epoch_seconds(claim_type, value)
            } else {
                TimeClaim::from_iso_date_time(claim_type, value)
            })
        })
        .collect()
}

/// Payload segment of a JWS
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JwsClaims {
    segment: Base64Segment,
    claims_type: ClaimsType,
    time_claims: Vec<TimeClaim>,
}

impl JwsClaims {
    /// Classify a decoded payload segment
    #[must_use]
    pub fn new(segment: Base64Segment) -> Self {
        let (claims_type, time_claims) = match std::str::from_utf8(segment.decoded()) {
            Ok(text) if json::is_json_object(text) => {
                (ClaimsType::Json, time_claims_from_payload(text))
            }
            _ => (ClaimsType::Text, Vec::new()),
        };

        Self {
            segment,
            claims_type,
            time_claims,
        }
    }

    /// Encode payload text
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(Base64Segment::encode(text))
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

    /// Decoded payload text
    #[must_use]
    pub fn decoded(&self) -> String {
        self.segment.decoded_text()
    }

    /// Payload kind
    #[must_use]
    pub fn claims_type(&self) -> ClaimsType {
        self.claims_type
    }

    /// Registered time claims found in a JSON payload
    #[must_use]
    pub fn time_claims(&self) -> &[TimeClaim] {
        &self.time_claims
    }

    /// Indented JSON for JSON payloads, the raw text otherwise
    #[must_use]
    pub fn pretty(&self) -> String {
        let text = self.decoded();
        match self.claims_type {
            ClaimsType::Json => json::pretty_print_json(&text).unwrap_or(text),
            ClaimsType::Text => text,
        }
    }
}
