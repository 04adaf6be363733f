//! Named curves for EC and OKP keys

use std::fmt;

use der::asn1::ObjectIdentifier;

use crate::algorithms::JwsAlgorithm;
use crate::error::{KeyError, Result};

/// Weierstrass curves supported for EC keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// NIST P-256
    P256,
    /// SECG secp256k1
    Secp256k1,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
}

impl EcCurve {
    /// Every supported curve
    pub const ALL: &'static [EcCurve] = &[
        EcCurve::P256,
        EcCurve::Secp256k1,
        EcCurve::P384,
        EcCurve::P521,
    ];

    /// JWK `crv` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::Secp256k1 => "secp256k1",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Named-curve object identifier
    #[must_use]
    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            EcCurve::P256 => ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"),
            EcCurve::Secp256k1 => ObjectIdentifier::new_unwrap("1.3.132.0.10"),
            EcCurve::P384 => ObjectIdentifier::new_unwrap("1.3.132.0.34"),
            EcCurve::P521 => ObjectIdentifier::new_unwrap("1.3.132.0.35"),
        }
    }

    /// Length in bytes of a coordinate or private scalar
    #[must_use]
    pub const fn coordinate_len(self) -> usize {
        match self {
            EcCurve::P256 | EcCurve::Secp256k1 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// The single JWS algorithm bound to this curve
    #[must_use]
    pub const fn signing_algorithm(self) -> JwsAlgorithm {
        match self {
            EcCurve::P256 => JwsAlgorithm::Es256,
            EcCurve::Secp256k1 => JwsAlgorithm::Es256k,
            EcCurve::P384 => JwsAlgorithm::Es384,
            EcCurve::P521 => JwsAlgorithm::Es512,
        }
    }

    /// Whether ECDH-ES key agreement is available on this curve
    #[must_use]
    pub const fn supports_key_agreement(self) -> bool {
        !matches!(self, EcCurve::Secp256k1)
    }

    /// Look up a curve by JWK name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| curve.name() == name)
            .ok_or_else(|| KeyError::unsupported(format!("unsupported EC curve '{name}'")))
    }

    /// Look up a curve by named-curve OID
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.iter().copied().find(|curve| curve.oid() == *oid)
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Curves supported for octet key pairs (RFC 8037)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OkpCurve {
    /// Ed25519 signatures
    Ed25519,
    /// Ed448 signatures
    Ed448,
    /// X25519 key agreement
    X25519,
    /// X448 key agreement
    X448,
}

impl OkpCurve {
    /// Every supported curve
    pub const ALL: &'static [OkpCurve] = &[
        OkpCurve::Ed25519,
        OkpCurve::Ed448,
        OkpCurve::X25519,
        OkpCurve::X448,
    ];

    /// JWK `crv` name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            OkpCurve::Ed25519 => "Ed25519",
            OkpCurve::Ed448 => "Ed448",
            OkpCurve::X25519 => "X25519",
            OkpCurve::X448 => "X448",
        }
    }

    /// Algorithm object identifier (RFC 8410)
    #[must_use]
    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            OkpCurve::Ed25519 => ObjectIdentifier::new_unwrap("1.3.101.112"),
            OkpCurve::Ed448 => ObjectIdentifier::new_unwrap("1.3.101.113"),
            OkpCurve::X25519 => ObjectIdentifier::new_unwrap("1.3.101.110"),
            OkpCurve::X448 => ObjectIdentifier::new_unwrap("1.3.101.111"),
        }
    }

    /// Length in bytes of public and private keys
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            OkpCurve::Ed25519 | OkpCurve::X25519 => 32,
            OkpCurve::Ed448 => 57,
            OkpCurve::X448 => 56,
        }
    }

    /// Whether this is an Edwards signing curve
    #[must_use]
    pub const fn is_signing(self) -> bool {
        matches!(self, OkpCurve::Ed25519 | OkpCurve::Ed448)
    }

    /// Look up a curve by JWK name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| curve.name() == name)
            .ok_or_else(|| KeyError::unsupported(format!("unsupported OKP curve '{name}'")))
    }

    /// Look up a curve by algorithm OID
    #[must_use]
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.iter().copied().find(|curve| curve.oid() == *oid)
    }
}

impl fmt::Display for OkpCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
