//! Password keys for PBES2 key management

use std::fmt;

use serde_json::{json, Map, Value};
use zeroize::Zeroizing;

use crate::algorithms::{EncryptionMethod, JweAlgorithm};
use crate::error::{KeyError, Result};

const PBES2_KEY_MANAGEMENT: &[JweAlgorithm] = &[
    JweAlgorithm::Pbes2Hs256A128Kw,
    JweAlgorithm::Pbes2Hs384A192Kw,
    JweAlgorithm::Pbes2Hs512A256Kw,
];

/// Password with the PBES2 salt length and iteration count used when encrypting
#[derive(Clone)]
pub struct PasswordKey {
    kid: String,
    password: Zeroizing<String>,
    salt_length: usize,
    iterations: u32,
}

impl PasswordKey {
    /// Create a password key
    pub fn new(
        kid: impl Into<String>,
        password: impl Into<String>,
        salt_length: usize,
        iterations: u32,
    ) -> Self {
        Self {
            kid: kid.into(),
            password: Zeroizing::new(password.into()),
            salt_length,
            iterations,
        }
    }

    /// Key identifier
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.kid
    }

    /// Password text
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// PBES2 salt input length in bytes
    #[must_use]
    pub fn salt_length(&self) -> usize {
        self.salt_length
    }

    /// PBKDF2 iteration count
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub(crate) fn with_key_id(&self, kid: String) -> Self {
        Self {
            kid,
            ..self.clone()
        }
    }

    pub(crate) fn key_encryption_algorithms(&self) -> &'static [JweAlgorithm] {
        PBES2_KEY_MANAGEMENT
    }

    pub(crate) fn content_encryption_algorithms(&self) -> &'static [EncryptionMethod] {
        EncryptionMethod::ALL
    }

    /// Persistence form: `{"password","key_id","salt_length","iterations"}`
    pub(crate) fn to_json(&self) -> Value {
        json!({
            "password": self.password.as_str(),
            "key_id": self.kid,
            "salt_length": self.salt_length,
            "iterations": self.iterations,
        })
    }

    /// Parse the persistence form, if the object carries every member
    pub(crate) fn from_json(object: &Map<String, Value>) -> Option<Result<Self>> {
        let members = ["key_id", "password", "salt_length", "iterations"];
        if members.iter().all(|member| object.contains_key(*member)) {
            Some(Self::parse_json(object))
        } else {
            None
        }
    }

    fn parse_json(object: &Map<String, Value>) -> Result<Self> {
        let text = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| KeyError::json(format!("'{name}' must be a string")))
        };
        let number = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_u64)
                .ok_or_else(|| KeyError::json(format!("'{name}' must be a non-negative integer")))
        };

        let salt_length = usize::try_from(number("salt_length")?)
            .map_err(|_| KeyError::json("'salt_length' out of range"))?;
        let iterations = u32::try_from(number("iterations")?)
            .map_err(|_| KeyError::json("'iterations' out of range"))?;
        Ok(Self::new(
            text("key_id")?,
            text("password")?,
            salt_length,
            iterations,
        ))
    }
}

impl fmt::Debug for PasswordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordKey")
            .field("kid", &self.kid)
            .field("salt_length", &self.salt_length)
            .field("iterations", &self.iterations)
            .finish_non_exhaustive()
    }
}
