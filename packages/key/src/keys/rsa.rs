//! RSA keys

use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};

const RSA_KEY_MANAGEMENT: &[JweAlgorithm] = &[
    JweAlgorithm::Rsa1_5,
    JweAlgorithm::RsaOaep,
    JweAlgorithm::RsaOaep256,
];

/// RSA public key with optional private half
#[derive(Debug, Clone)]
pub struct RsaKey {
    kid: Option<String>,
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl RsaKey {
    /// Public-only key
    #[must_use]
    pub fn from_public(public: RsaPublicKey, kid: Option<String>) -> Self {
        Self {
            kid,
            public,
            private: None,
        }
    }

    /// Key pair from a private key
    #[must_use]
    pub fn from_private(private: RsaPrivateKey, kid: Option<String>) -> Self {
        Self {
            kid,
            public: private.to_public_key(),
            private: Some(private),
        }
    }

    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Public half
    #[must_use]
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Private half, when present
    #[must_use]
    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        self.private.as_ref()
    }

    /// Modulus size in bits
    #[must_use]
    pub fn bits(&self) -> usize {
        self.public.n().bits()
    }

    pub(crate) fn with_key_id(&self, kid: Option<String>) -> Self {
        Self {
            kid,
            ..self.clone()
        }
    }

    pub(crate) fn to_public(&self) -> Self {
        Self::from_public(self.public.clone(), self.kid.clone())
    }

    pub(crate) fn can_encrypt(&self) -> bool {
        self.bits() >= 2048
    }

    pub(crate) fn signing_algorithms(&self) -> &'static [JwsAlgorithm] {
        // Short moduli cannot hold every digest's encoding
        match self.bits() {
            512 => &[JwsAlgorithm::Rs256],
            1024 => &[
                JwsAlgorithm::Rs256,
                JwsAlgorithm::Rs384,
                JwsAlgorithm::Rs512,
                JwsAlgorithm::Ps256,
                JwsAlgorithm::Ps384,
            ],
            _ => &[
                JwsAlgorithm::Rs256,
                JwsAlgorithm::Rs384,
                JwsAlgorithm::Rs512,
                JwsAlgorithm::Ps256,
                JwsAlgorithm::Ps384,
                JwsAlgorithm::Ps512,
            ],
        }
    }

    pub(crate) fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        if self.can_encrypt() {
            RSA_KEY_MANAGEMENT
        } else {
            &[]
        }
    }

    pub(crate) fn content_encryption_algorithms(&self) -> &'static [EncryptionMethod] {
        EncryptionMethod::ALL
    }
}
