//! Records of tokens observed in traffic

use std::sync::atomic::{AtomicU64, Ordering};

use crate::jws::Jws;

/// Session-scoped source of token identifiers
///
/// Identifiers start at one more than the initial value and increase by
/// one per call, across threads.
#[derive(Debug, Default)]
pub struct TokenIdGenerator {
    counter: AtomicU64,
}

impl TokenIdGenerator {
    /// First identifier handed out is 1
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Continue after a previously issued identifier
    #[must_use]
    pub fn starting_at(last_id: u64) -> Self {
        Self {
            counter: AtomicU64::new(last_id),
        }
    }

    /// Next identifier
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A JWS seen in a request, with where it was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    id: u64,
    host: String,
    path: String,
    jws: Jws,
}

impl Token {
    /// Record `jws`, taking the next identifier from `ids`
    pub fn new(ids: &TokenIdGenerator, host: impl Into<String>, path: impl Into<String>, jws: Jws) -> Self {
        Self {
            id: ids.next(),
            host: host.into(),
            path: path.into(),
            jws,
        }
    }

    /// Identifier
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Host the token was sent to
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The token
    #[must_use]
    pub fn jws(&self) -> &Jws {
        &self.jws
    }

    /// Header `alg`, empty when absent
    #[must_use]
    pub fn algorithm(&self) -> String {
        self.jws.header().algorithm()
    }

    /// Header `kid`
    #[must_use]
    pub fn key_id(&self) -> Option<String> {
        self.jws.header().key_id()
    }

    /// Payload for display; JSON payloads are indented
    #[must_use]
    pub fn claims(&self) -> String {
        self.jws.claims().pretty()
    }
}
