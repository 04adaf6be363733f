//! PEM import and export for RSA, EC and OKP keys
//!
//! Export always writes LF line endings, 64-column bodies and a trailing
//! newline:
//!
//! | key | label | structure |
//! |-----|-------|-----------|
//! | RSA public | `PUBLIC KEY` | SPKI |
//! | RSA private | `RSA PRIVATE KEY` | PKCS#1 |
//! | EC public | `PUBLIC KEY` | SPKI |
//! | EC private | `PRIVATE KEY` | PKCS#8 |
//! | OKP public | `PUBLIC KEY` | SPKI (RFC 8410) |
//! | OKP private | `PRIVATE KEY` | PKCS#8 (RFC 8410) |

mod asn1;

use ::der::asn1::ObjectIdentifier;
use ::pem::{EncodeConfig, LineEnding, Pem};
use pkcs8::{EncodePrivateKey, PrivateKeyInfo};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sec1::EcPrivateKey;
use spki::SubjectPublicKeyInfoRef;
use tracing::debug;

use self::asn1::OkpDer;
use crate::curves::EcCurve;
use crate::error::{KeyError, PemStage, Result};
use crate::keys::{EcKey, Key, OkpKey, RsaKey};

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Label and DER body of a PEM document
fn read_pem(text: &str) -> Result<Pem> {
    ::pem::parse(text.trim()).map_err(|e| KeyError::pem(PemStage::Read, e.to_string()))
}

fn write_pem(label: &str, der: &[u8]) -> String {
    let config = EncodeConfig::new().set_line_ending(LineEnding::LF);
    ::pem::encode_config(&Pem::new(label, der), config)
}

fn cast_error(error: impl std::fmt::Display) -> KeyError {
    KeyError::pem(PemStage::TypeCast, error.to_string())
}

fn unexpected_label(label: &str) -> KeyError {
    KeyError::pem(PemStage::TypeCast, format!("unexpected PEM label '{label}'"))
}

/// Convert a PEM document of any supported family into a key
///
/// RSA is tried first, then EC, then OKP; the last failure is returned.
pub fn pem_to_key(pem: &str, kid: Option<String>) -> Result<Key> {
    pem_to_rsa_key(pem, kid.clone())
        .or_else(|error| {
            debug!(%error, "PEM is not an RSA key");
            pem_to_ec_key(pem, kid.clone())
        })
        .or_else(|error| {
            debug!(%error, "PEM is not an EC key");
            pem_to_okp_key(pem, kid)
        })
}

/// Convert a PEM document holding an RSA key
pub fn pem_to_rsa_key(pem: &str, kid: Option<String>) -> Result<Key> {
    let document = read_pem(pem)?;
    let der = document.contents();

    let key = match document.tag() {
        "PUBLIC KEY" => {
            RsaKey::from_public(RsaPublicKey::from_public_key_der(der).map_err(cast_error)?, kid)
        }
        "RSA PUBLIC KEY" => {
            RsaKey::from_public(RsaPublicKey::from_pkcs1_der(der).map_err(cast_error)?, kid)
        }
        "RSA PRIVATE KEY" => {
            RsaKey::from_private(RsaPrivateKey::from_pkcs1_der(der).map_err(cast_error)?, kid)
        }
        "PRIVATE KEY" => {
            RsaKey::from_private(RsaPrivateKey::from_pkcs8_der(der).map_err(cast_error)?, kid)
        }
        label => return Err(unexpected_label(label)),
    };
    Ok(Key::Rsa(key))
}

/// Convert a PEM document holding an EC key
///
/// PKCS#8 private keys take the curve from the algorithm parameters and
/// derive the public point from the private scalar.
pub fn pem_to_ec_key(pem: &str, kid: Option<String>) -> Result<Key> {
    let document = read_pem(pem)?;
    let der = document.contents();

    let key = match document.tag() {
        "EC PRIVATE KEY" => {
            let private = EcPrivateKey::try_from(der).map_err(cast_error)?;
            let oid = private
                .parameters
                .and_then(|parameters| parameters.named_curve())
                .ok_or_else(|| cast_error("EC private key does not name its curve"))?;
            EcKey::from_private_scalar(ec_curve(&oid)?, private.private_key, kid)?
        }
        "PUBLIC KEY" => {
            let info = SubjectPublicKeyInfoRef::try_from(der)
                .map_err(|e| KeyError::pem(PemStage::Read, e.to_string()))?;
            let curve = ec_algorithm_curve(info.algorithm.oid, info.algorithm.parameters_oid())?;
            let point = info
                .subject_public_key
                .as_bytes()
                .ok_or_else(|| cast_error("public key BIT STRING is not byte aligned"))?;
            EcKey::from_sec1_point(curve, point, kid)?
        }
        "PRIVATE KEY" => {
            let info = PrivateKeyInfo::try_from(der)
                .map_err(|e| KeyError::pem(PemStage::Read, e.to_string()))?;
            let curve = ec_algorithm_curve(info.algorithm.oid, info.algorithm.parameters_oid())?;
            let private = EcPrivateKey::try_from(info.private_key).map_err(cast_error)?;
            EcKey::from_private_scalar(curve, private.private_key, kid)?
        }
        label => return Err(unexpected_label(label)),
    };
    Ok(Key::Ec(key))
}

fn ec_curve(oid: &ObjectIdentifier) -> Result<EcCurve> {
    EcCurve::from_oid(oid).ok_or_else(|| cast_error(format!("unsupported EC curve OID {oid}")))
}

fn ec_algorithm_curve(
    algorithm: ObjectIdentifier,
    parameters: spki::Result<ObjectIdentifier>,
) -> Result<EcCurve> {
    if algorithm != ID_EC_PUBLIC_KEY {
        return Err(cast_error(format!("algorithm {algorithm} is not an EC key")));
    }
    ec_curve(&parameters.map_err(cast_error)?)
}

/// Convert a PEM document holding an Ed25519, Ed448, X25519 or X448 key
pub fn pem_to_okp_key(pem: &str, kid: Option<String>) -> Result<Key> {
    let document = read_pem(pem)?;
    let key = match asn1::decode_okp(document.contents())? {
        OkpDer::Public(curve, x) => OkpKey::from_public(curve, &x, kid)?,
        OkpDer::Private(curve, d) => OkpKey::from_private(curve, &d, kid)?,
    };
    Ok(Key::Okp(key))
}

/// PEM encoding of an RSA, EC or OKP key
///
/// Private keys are written in their private form.
pub fn key_to_pem(key: &Key) -> Result<String> {
    let encode_error = |e: &dyn std::fmt::Display| KeyError::pem(PemStage::Encode, e.to_string());

    match key {
        Key::Rsa(rsa) => match rsa.private_key() {
            Some(private) => {
                let der = private.to_pkcs1_der().map_err(|e| encode_error(&e))?;
                Ok(write_pem("RSA PRIVATE KEY", der.as_bytes()))
            }
            None => {
                let der = rsa
                    .public_key()
                    .to_public_key_der()
                    .map_err(|e| encode_error(&e))?;
                Ok(write_pem("PUBLIC KEY", der.as_bytes()))
            }
        },
        Key::Ec(ec) => {
            let curve = ec.curve();
            match ec.d() {
                Some(d) => {
                    let der = crate::with_ec_curve!(curve, c => {
                        c::SecretKey::from_slice(d)
                            .map_err(|e| encode_error(&e))?
                            .to_pkcs8_der()
                            .map_err(|e| encode_error(&e))?
                    });
                    Ok(write_pem("PRIVATE KEY", der.as_bytes()))
                }
                None => {
                    let point = ec.sec1_point();
                    let der = crate::with_ec_curve!(curve, c => {
                        c::PublicKey::from_sec1_bytes(&point)
                            .map_err(|e| encode_error(&e))?
                            .to_public_key_der()
                            .map_err(|e| encode_error(&e))?
                    });
                    Ok(write_pem("PUBLIC KEY", der.as_bytes()))
                }
            }
        }
        Key::Okp(okp) => match okp.d() {
            Some(d) => Ok(write_pem(
                "PRIVATE KEY",
                &asn1::encode_okp_private(okp.curve(), d)?,
            )),
            None => Ok(write_pem(
                "PUBLIC KEY",
                &asn1::encode_okp_public(okp.curve(), okp.x())?,
            )),
        },
        Key::Symmetric(_) | Key::Password(_) => Err(KeyError::unsupported(format!(
            "{} keys have no PEM form",
            key.description()
        ))),
    }
}
