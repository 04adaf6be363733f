//! Symmetric (`oct`) keys

use std::fmt;

use rand::Rng;
use zeroize::Zeroizing;

use crate::algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};
use crate::bits_macro::BitSize;
use crate::error::{KeyError, Result};

const ALL_CONTENT: &[EncryptionMethod] = EncryptionMethod::ALL;

/// Shared secret usable for HMAC signing and AES key management
#[derive(Clone)]
pub struct SymmetricKey {
    kid: Option<String>,
    secret: Zeroizing<Vec<u8>>,
}

impl SymmetricKey {
    /// Wrap existing secret bytes
    pub fn new(kid: Option<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            kid,
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Generate a random secret of the given size
    pub fn generate(size: BitSize, kid: Option<String>) -> Result<Self> {
        if !size.is_byte_aligned() {
            return Err(KeyError::invalid_key(format!(
                "symmetric key size must be a positive multiple of 8 bits, got {}",
                size.bits
            )));
        }

        let mut secret = Zeroizing::new(vec![0u8; size.to_bytes()]);
        rand::rng().fill(secret.as_mut_slice());
        Ok(Self { kid, secret })
    }

    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Raw secret bytes
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Secret size in bits
    #[must_use]
    pub fn bits(&self) -> usize {
        self.secret.len() * 8
    }

    pub(crate) fn with_key_id(&self, kid: Option<String>) -> Self {
        Self {
            kid,
            secret: self.secret.clone(),
        }
    }

    pub(crate) fn signing_algorithms(&self) -> &'static [JwsAlgorithm] {
        JwsAlgorithm::HMAC
    }

    pub(crate) fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        match self.bits() {
            128 => &[JweAlgorithm::Dir, JweAlgorithm::A128Kw, JweAlgorithm::A128GcmKw],
            192 => &[JweAlgorithm::Dir, JweAlgorithm::A192Kw, JweAlgorithm::A192GcmKw],
            256 => &[JweAlgorithm::Dir, JweAlgorithm::A256Kw, JweAlgorithm::A256GcmKw],
            384 | 512 => &[JweAlgorithm::Dir],
            _ => &[],
        }
    }

    pub(crate) fn content_encryption_algorithms(
        &self,
        kek: JweAlgorithm,
    ) -> &'static [EncryptionMethod] {
        if kek != JweAlgorithm::Dir {
            return ALL_CONTENT;
        }
        // Direct encryption needs a secret of exactly the content key size
        match self.bits() {
            128 => &[EncryptionMethod::A128Gcm],
            192 => &[EncryptionMethod::A192Gcm],
            256 => &[EncryptionMethod::A256Gcm, EncryptionMethod::A128CbcHs256],
            384 => &[EncryptionMethod::A192CbcHs384],
            512 => &[EncryptionMethod::A256CbcHs512],
            _ => ALL_CONTENT,
        }
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("kid", &self.kid)
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}
