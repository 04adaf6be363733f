//! Trial verification and decryption against a set of keys

use jwtsmith_key::Key;
use tracing::{debug, trace};

use crate::jwe::Jwe;
use crate::jws::Jws;
use crate::operations;

/// Caller-owned, ordered collection of keys
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    keys: Vec<Key>,
}

impl KeyRing {
    /// Build a ring; keys are tried in the given order
    #[must_use]
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    /// Keys in the ring
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// First key whose signature over `jws` checks out
    ///
    /// The header algorithm is ignored: every signing algorithm of every
    /// verify-capable key is tried.
    #[must_use]
    pub fn find_verifying_key(&self, jws: &Jws) -> Option<&Key> {
        let found = self.keys.iter().filter(|key| key.can_verify()).find(|key| {
            key.signing_algorithms().iter().any(|&algorithm| {
                let verified = operations::verify(jws, key, algorithm);
                trace!(key = %key, %algorithm, ?verified, "trial verification");
                matches!(verified, Ok(true))
            })
        });
        debug!(found = found.is_some(), keys = self.keys.len(), "searched key ring for verifying key");
        found
    }

    /// Plaintext of `jwe` under the first decrypt-capable key that opens it
    #[must_use]
    pub fn attempt_decryption(&self, jwe: &Jwe) -> Option<Jws> {
        self.keys
            .iter()
            .filter(|key| key.can_decrypt())
            .find_map(|key| match operations::decrypt(jwe, key) {
                Ok(jws) => Some(jws),
                Err(e) => {
                    trace!(key = %key, error = %e, "trial decryption failed");
                    None
                }
            })
    }
}

impl FromIterator<Key> for KeyRing {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
