//! Key capability model
//!
//! Every key family answers the same questions: which operations it can
//! perform and with which algorithms. The answers are pure functions of the
//! family, whether private material is present and the curve or size, so
//! they can never disagree with the key material itself.

mod ec;
mod okp;
mod password;
mod rsa;
mod symmetric;

use std::fmt;

use serde_json::Value;

pub use self::ec::EcKey;
pub use self::okp::OkpKey;
pub use self::password::PasswordKey;
pub use self::rsa::RsaKey;
pub use self::symmetric::SymmetricKey;

use crate::algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};
use crate::error::{KeyError, Result};

/// A key of any supported family
#[derive(Debug, Clone)]
pub enum Key {
    /// Shared secret (`oct`)
    Symmetric(SymmetricKey),
    /// RSA key
    Rsa(RsaKey),
    /// Elliptic curve key
    Ec(EcKey),
    /// Octet key pair
    Okp(OkpKey),
    /// Password for PBES2
    Password(PasswordKey),
}

impl Key {
    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        match self {
            Key::Symmetric(key) => key.key_id(),
            Key::Rsa(key) => key.key_id(),
            Key::Ec(key) => key.key_id(),
            Key::Okp(key) => key.key_id(),
            Key::Password(key) => Some(key.key_id()),
        }
    }

    /// Whether the key has a public half (every asymmetric family)
    #[must_use]
    pub fn is_public(&self) -> bool {
        !matches!(self, Key::Symmetric(_) | Key::Password(_))
    }

    /// Whether secret material is present
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self {
            Key::Symmetric(_) | Key::Password(_) => true,
            Key::Rsa(key) => key.private_key().is_some(),
            Key::Ec(key) => key.d().is_some(),
            Key::Okp(key) => key.d().is_some(),
        }
    }

    /// Whether the key can produce signatures
    #[must_use]
    pub fn can_sign(&self) -> bool {
        match self {
            Key::Symmetric(_) => true,
            Key::Rsa(_) | Key::Ec(_) => self.is_private(),
            Key::Okp(key) => key.curve().is_signing() && self.is_private(),
            Key::Password(_) => false,
        }
    }

    /// Whether the key can check signatures
    #[must_use]
    pub fn can_verify(&self) -> bool {
        match self {
            Key::Symmetric(_) | Key::Rsa(_) | Key::Ec(_) => true,
            Key::Okp(key) => key.curve().is_signing(),
            Key::Password(_) => false,
        }
    }

    /// Whether the key can encrypt a content encryption key
    #[must_use]
    pub fn can_encrypt(&self) -> bool {
        match self {
            Key::Symmetric(_) | Key::Password(_) => true,
            Key::Rsa(key) => key.can_encrypt(),
            Key::Ec(key) => key.curve().supports_key_agreement(),
            Key::Okp(key) => !key.curve().is_signing(),
        }
    }

    /// Whether the key can recover a content encryption key
    #[must_use]
    pub fn can_decrypt(&self) -> bool {
        match self {
            Key::Symmetric(_) | Key::Password(_) => true,
            _ => self.can_encrypt() && self.is_private(),
        }
    }

    /// Whether the key has a PEM form
    #[must_use]
    pub fn has_pem(&self) -> bool {
        matches!(self, Key::Rsa(_) | Key::Ec(_) | Key::Okp(_))
    }

    /// Whether [`crate::key_to_pem`] accepts the key
    #[must_use]
    pub fn can_convert_to_pem(&self) -> bool {
        self.has_pem()
    }

    /// Whether the key has a JSON Web Key form
    #[must_use]
    pub fn has_jwk(&self) -> bool {
        !matches!(self, Key::Password(_))
    }

    /// JWS algorithms this key can sign or verify with
    #[must_use]
    pub fn signing_algorithms(&self) -> &'static [JwsAlgorithm] {
        match self {
            Key::Symmetric(key) => key.signing_algorithms(),
            Key::Rsa(key) => key.signing_algorithms(),
            Key::Ec(key) => key.signing_algorithms(),
            Key::Okp(key) => key.signing_algorithms(),
            Key::Password(_) => &[],
        }
    }

    /// JWE key management algorithms this key supports
    #[must_use]
    pub fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        match self {
            Key::Symmetric(key) => key.key_encryption_algorithms(),
            Key::Rsa(key) => key.key_encryption_algorithms(),
            Key::Ec(key) => key.key_encryption_algorithms(),
            Key::Okp(key) => key.key_encryption_algorithms(),
            Key::Password(key) => key.key_encryption_algorithms(),
        }
    }

    /// Content encryption methods usable with `kek`
    #[must_use]
    pub fn content_encryption_algorithms(&self, kek: JweAlgorithm) -> &'static [EncryptionMethod] {
        match self {
            Key::Symmetric(key) => key.content_encryption_algorithms(kek),
            Key::Rsa(key) => key.content_encryption_algorithms(),
            Key::Ec(key) => key.content_encryption_algorithms(),
            Key::Okp(key) => key.content_encryption_algorithms(),
            Key::Password(key) => key.content_encryption_algorithms(),
        }
    }

    /// Short human readable description such as `RSA 2048` or `P-256`
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Key::Symmetric(key) => format!("OCT {}", key.bits()),
            Key::Rsa(key) => format!("RSA {}", key.bits()),
            Key::Ec(key) => key.curve().name().to_string(),
            Key::Okp(key) => key.curve().name().to_string(),
            Key::Password(_) => "Password".to_string(),
        }
    }

    /// Same key material under a new identifier
    #[must_use]
    pub fn with_key_id(&self, kid: impl Into<String>) -> Key {
        let kid = kid.into();
        match self {
            Key::Symmetric(key) => Key::Symmetric(key.with_key_id(Some(kid))),
            Key::Rsa(key) => Key::Rsa(key.with_key_id(Some(kid))),
            Key::Ec(key) => Key::Ec(key.with_key_id(Some(kid))),
            Key::Okp(key) => Key::Okp(key.with_key_id(Some(kid))),
            Key::Password(key) => Key::Password(key.with_key_id(kid)),
        }
    }

    /// Public half of an asymmetric key
    pub fn to_public(&self) -> Result<Key> {
        match self {
            Key::Rsa(key) => Ok(Key::Rsa(key.to_public())),
            Key::Ec(key) => Ok(Key::Ec(key.to_public())),
            Key::Okp(key) => Ok(Key::Okp(key.to_public())),
            Key::Symmetric(_) | Key::Password(_) => Err(KeyError::unsupported(format!(
                "{} keys have no public half",
                self.description()
            ))),
        }
    }

    /// Persistence form: the full JWK, or the password object for password keys
    pub fn to_json_object(&self) -> Result<Value> {
        match self {
            Key::Password(key) => Ok(key.to_json()),
            _ => self.to_jwk(true),
        }
    }

    /// Parse the persistence form written by [`Key::to_json_object`]
    pub fn from_json_object(value: &Value) -> Result<Key> {
        let object = value
            .as_object()
            .ok_or_else(|| KeyError::json("key must be a JSON object"))?;
        match PasswordKey::from_json(object) {
            Some(password) => password.map(Key::Password),
            None => Key::from_jwk(value),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key_id() {
            Some(kid) => write!(f, "{kid} ({})", self.description()),
            None => f.write_str(&self.description()),
        }
    }
}

impl From<SymmetricKey> for Key {
    fn from(key: SymmetricKey) -> Self {
        Key::Symmetric(key)
    }
}

impl From<RsaKey> for Key {
    fn from(key: RsaKey) -> Self {
        Key::Rsa(key)
    }
}

impl From<EcKey> for Key {
    fn from(key: EcKey) -> Self {
        Key::Ec(key)
    }
}

impl From<OkpKey> for Key {
    fn from(key: OkpKey) -> Self {
        Key::Okp(key)
    }
}

impl From<PasswordKey> for Key {
    fn from(key: PasswordKey) -> Self {
        Key::Password(key)
    }
}
