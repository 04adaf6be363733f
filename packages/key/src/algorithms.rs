//! JOSE algorithm identifiers
//!
//! Signing algorithms (JWS `alg`), key management algorithms (JWE `alg`) and
//! content encryption methods (JWE `enc`), with their registered names.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

macro_rules! registered_names {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every value in registry order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Registered name
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = KeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.name() == s)
                    .ok_or_else(|| {
                        KeyError::unsupported(format!("unknown {} '{s}'", stringify!($name)))
                    })
            }
        }
    };
}

registered_names! {
    /// JWS signing algorithm
    pub enum JwsAlgorithm {
        /// HMAC using SHA-256
        Hs256 => "HS256",
        /// HMAC using SHA-384
        Hs384 => "HS384",
        /// HMAC using SHA-512
        Hs512 => "HS512",
        /// RSASSA-PKCS1-v1_5 using SHA-256
        Rs256 => "RS256",
        /// RSASSA-PKCS1-v1_5 using SHA-384
        Rs384 => "RS384",
        /// RSASSA-PKCS1-v1_5 using SHA-512
        Rs512 => "RS512",
        /// RSASSA-PSS using SHA-256
        Ps256 => "PS256",
        /// RSASSA-PSS using SHA-384
        Ps384 => "PS384",
        /// RSASSA-PSS using SHA-512
        Ps512 => "PS512",
        /// ECDSA using P-256 and SHA-256
        Es256 => "ES256",
        /// ECDSA using secp256k1 and SHA-256
        Es256k => "ES256K",
        /// ECDSA using P-384 and SHA-384
        Es384 => "ES384",
        /// ECDSA using P-521 and SHA-512
        Es512 => "ES512",
        /// Edwards-curve signatures (Ed25519, Ed448)
        EdDsa => "EdDSA",
    }
}

impl JwsAlgorithm {
    /// HMAC signing algorithms
    pub const HMAC: &'static [JwsAlgorithm] =
        &[JwsAlgorithm::Hs256, JwsAlgorithm::Hs384, JwsAlgorithm::Hs512];

    /// NIST-curve ECDSA algorithms
    pub const NIST_ECDSA: &'static [JwsAlgorithm] =
        &[JwsAlgorithm::Es256, JwsAlgorithm::Es384, JwsAlgorithm::Es512];

    /// Whether this is an HMAC algorithm
    #[must_use]
    pub fn is_hmac(self) -> bool {
        Self::HMAC.contains(&self)
    }

    /// Whether this is an ECDSA algorithm
    #[must_use]
    pub fn is_ecdsa(self) -> bool {
        matches!(
            self,
            JwsAlgorithm::Es256 | JwsAlgorithm::Es256k | JwsAlgorithm::Es384 | JwsAlgorithm::Es512
        )
    }
}

registered_names! {
    /// JWE key management algorithm
    pub enum JweAlgorithm {
        /// RSAES-PKCS1-v1_5
        Rsa1_5 => "RSA1_5",
        /// RSAES OAEP using SHA-1 and MGF1 with SHA-1
        RsaOaep => "RSA-OAEP",
        /// RSAES OAEP using SHA-256 and MGF1 with SHA-256
        RsaOaep256 => "RSA-OAEP-256",
        /// AES key wrap with a 128-bit key
        A128Kw => "A128KW",
        /// AES key wrap with a 192-bit key
        A192Kw => "A192KW",
        /// AES key wrap with a 256-bit key
        A256Kw => "A256KW",
        /// Direct use of a shared symmetric key
        Dir => "dir",
        /// Elliptic curve Diffie-Hellman ephemeral static, direct agreement
        EcdhEs => "ECDH-ES",
        /// ECDH-ES with A128KW
        EcdhEsA128Kw => "ECDH-ES+A128KW",
        /// ECDH-ES with A192KW
        EcdhEsA192Kw => "ECDH-ES+A192KW",
        /// ECDH-ES with A256KW
        EcdhEsA256Kw => "ECDH-ES+A256KW",
        /// AES-GCM key wrap with a 128-bit key
        A128GcmKw => "A128GCMKW",
        /// AES-GCM key wrap with a 192-bit key
        A192GcmKw => "A192GCMKW",
        /// AES-GCM key wrap with a 256-bit key
        A256GcmKw => "A256GCMKW",
        /// PBES2 with HMAC-SHA-256 and A128KW
        Pbes2Hs256A128Kw => "PBES2-HS256+A128KW",
        /// PBES2 with HMAC-SHA-384 and A192KW
        Pbes2Hs384A192Kw => "PBES2-HS384+A192KW",
        /// PBES2 with HMAC-SHA-512 and A256KW
        Pbes2Hs512A256Kw => "PBES2-HS512+A256KW",
    }
}

impl JweAlgorithm {
    /// Length in bytes of the AES key-wrapping key this algorithm uses, if any
    #[must_use]
    pub fn wrapping_key_len(self) -> Option<usize> {
        match self {
            JweAlgorithm::A128Kw
            | JweAlgorithm::A128GcmKw
            | JweAlgorithm::EcdhEsA128Kw
            | JweAlgorithm::Pbes2Hs256A128Kw => Some(16),
            JweAlgorithm::A192Kw
            | JweAlgorithm::A192GcmKw
            | JweAlgorithm::EcdhEsA192Kw
            | JweAlgorithm::Pbes2Hs384A192Kw => Some(24),
            JweAlgorithm::A256Kw
            | JweAlgorithm::A256GcmKw
            | JweAlgorithm::EcdhEsA256Kw
            | JweAlgorithm::Pbes2Hs512A256Kw => Some(32),
            JweAlgorithm::Rsa1_5
            | JweAlgorithm::RsaOaep
            | JweAlgorithm::RsaOaep256
            | JweAlgorithm::Dir
            | JweAlgorithm::EcdhEs => None,
        }
    }
}

registered_names! {
    /// JWE content encryption method
    pub enum EncryptionMethod {
        /// AES-GCM with a 128-bit key
        A128Gcm => "A128GCM",
        /// AES-GCM with a 192-bit key
        A192Gcm => "A192GCM",
        /// AES-GCM with a 256-bit key
        A256Gcm => "A256GCM",
        /// AES-128-CBC with HMAC-SHA-256
        A128CbcHs256 => "A128CBC-HS256",
        /// AES-192-CBC with HMAC-SHA-384
        A192CbcHs384 => "A192CBC-HS384",
        /// AES-256-CBC with HMAC-SHA-512
        A256CbcHs512 => "A256CBC-HS512",
    }
}

impl EncryptionMethod {
    /// Content encryption key length in bytes
    #[must_use]
    pub fn key_len(self) -> usize {
        match self {
            EncryptionMethod::A128Gcm => 16,
            EncryptionMethod::A192Gcm => 24,
            EncryptionMethod::A256Gcm => 32,
            EncryptionMethod::A128CbcHs256 => 32,
            EncryptionMethod::A192CbcHs384 => 48,
            EncryptionMethod::A256CbcHs512 => 64,
        }
    }

    /// Whether this is an AES-GCM method
    #[must_use]
    pub fn is_gcm(self) -> bool {
        matches!(
            self,
            EncryptionMethod::A128Gcm | EncryptionMethod::A192Gcm | EncryptionMethod::A256Gcm
        )
    }
}
