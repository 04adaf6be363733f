//! Octet key pairs (RFC 8037): Ed25519, Ed448, X25519 and X448

use std::fmt;

use zeroize::Zeroizing;

use crate::algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};
use crate::curves::OkpCurve;
use crate::error::{KeyError, Result};

/// Octet key pair public key with optional private key
#[derive(Clone)]
pub struct OkpKey {
    kid: Option<String>,
    curve: OkpCurve,
    x: Vec<u8>,
    d: Option<Zeroizing<Vec<u8>>>,
}

fn sized<const N: usize>(curve: OkpCurve, bytes: &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| {
        KeyError::invalid_key(format!(
            "{curve} keys are {} bytes, got {}",
            curve.key_len(),
            bytes.len()
        ))
    })
}

/// Derive the public key for a private key on `curve`.
pub(crate) fn derive_public(curve: OkpCurve, d: &[u8]) -> Result<Vec<u8>> {
    match curve {
        OkpCurve::Ed25519 => {
            let seed = Zeroizing::new(sized::<32>(curve, d)?);
            let signing = ed25519_dalek::SigningKey::from_bytes(&seed);
            Ok(signing.verifying_key().to_bytes().to_vec())
        }
        OkpCurve::Ed448 => {
            let signing = ed448_goldilocks_plus::SigningKey::try_from(d)
                .map_err(|_| KeyError::invalid_key("Ed448 private keys are 57 bytes"))?;
            Ok(signing.verifying_key().to_bytes().to_vec())
        }
        OkpCurve::X25519 => {
            let scalar = sized::<32>(curve, d)?;
            let secret = x25519_dalek::StaticSecret::from(scalar);
            Ok(x25519_dalek::PublicKey::from(&secret).as_bytes().to_vec())
        }
        OkpCurve::X448 => {
            let secret = x448::Secret::from_bytes(d)
                .ok_or_else(|| KeyError::invalid_key("X448 keys are 56 bytes"))?;
            Ok(x448::PublicKey::from(&secret).as_bytes().to_vec())
        }
    }
}

impl OkpKey {
    /// Public-only key
    pub fn from_public(curve: OkpCurve, x: &[u8], kid: Option<String>) -> Result<Self> {
        if x.len() != curve.key_len() {
            return Err(KeyError::invalid_key(format!(
                "{curve} public keys are {} bytes, got {}",
                curve.key_len(),
                x.len()
            )));
        }
        match curve {
            OkpCurve::Ed25519 => {
                ed25519_dalek::VerifyingKey::from_bytes(&sized::<32>(curve, x)?).map_err(|_| {
                    KeyError::invalid_key("Ed25519 public key is not a curve point")
                })?;
            }
            OkpCurve::Ed448 => {
                ed448_goldilocks_plus::VerifyingKey::from_bytes(&sized::<57>(curve, x)?)
                    .map_err(|_| KeyError::invalid_key("Ed448 public key is not a curve point"))?;
            }
            OkpCurve::X25519 | OkpCurve::X448 => {}
        }
        Ok(Self {
            kid,
            curve,
            x: x.to_vec(),
            d: None,
        })
    }

    /// Key pair from a private key; the public key is derived
    pub fn from_private(curve: OkpCurve, d: &[u8], kid: Option<String>) -> Result<Self> {
        let x = derive_public(curve, d)?;
        Ok(Self {
            kid,
            curve,
            x,
            d: Some(Zeroizing::new(d.to_vec())),
        })
    }

    /// Key pair from both halves, checking they belong together
    pub fn from_private_parts(
        curve: OkpCurve,
        x: &[u8],
        d: &[u8],
        kid: Option<String>,
    ) -> Result<Self> {
        let key = Self::from_private(curve, d, kid)?;
        if key.x != x {
            return Err(KeyError::invalid_key(
                "public key does not match the private key",
            ));
        }
        Ok(key)
    }

    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Curve
    #[must_use]
    pub fn curve(&self) -> OkpCurve {
        self.curve
    }

    /// Public key bytes
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.x
    }

    /// Private key bytes, when present
    #[must_use]
    pub fn d(&self) -> Option<&[u8]> {
        self.d.as_deref().map(Vec::as_slice)
    }

    pub(crate) fn with_key_id(&self, kid: Option<String>) -> Self {
        Self {
            kid,
            ..self.clone()
        }
    }

    pub(crate) fn to_public(&self) -> Self {
        Self {
            d: None,
            ..self.clone()
        }
    }

    pub(crate) fn signing_algorithms(&self) -> &'static [JwsAlgorithm] {
        if self.curve.is_signing() {
            &[JwsAlgorithm::EdDsa]
        } else {
            &[]
        }
    }

    pub(crate) fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        if self.curve.is_signing() {
            &[]
        } else {
            &[JweAlgorithm::EcdhEs]
        }
    }

    pub(crate) fn content_encryption_algorithms(&self) -> &'static [EncryptionMethod] {
        EncryptionMethod::ALL
    }
}

impl fmt::Debug for OkpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OkpKey")
            .field("kid", &self.kid)
            .field("curve", &self.curve)
            .field("private", &self.d.is_some())
            .finish_non_exhaustive()
    }
}
