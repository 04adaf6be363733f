//! DER layout of RFC 8410 octet key pairs
//!
//! ```text
//! public:  SEQUENCE { SEQUENCE { OID }, BIT STRING { x } }
//! private: SEQUENCE { INTEGER 0, SEQUENCE { OID }, OCTET STRING { OCTET STRING { d } } }
//! ```
//!
//! Decoding walks the elements by hand so each failure can be reported with
//! the stage that went wrong.

use ::der::asn1::{AnyRef, BitStringRef, ObjectIdentifier, OctetStringRef};
use ::der::{Decode, Encode, Reader, SliceReader, Tag, Tagged};
use pkcs8::PrivateKeyInfo;
use spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};

use crate::curves::OkpCurve;
use crate::error::{KeyError, PemStage, Result};

/// Key material carried by an OKP DER document
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum OkpDer {
    /// Public key bytes
    Public(OkpCurve, Vec<u8>),
    /// Private key bytes
    Private(OkpCurve, Vec<u8>),
}

fn read_error(error: ::der::Error) -> KeyError {
    KeyError::pem(PemStage::Read, error.to_string())
}

fn cast_error(error: ::der::Error) -> KeyError {
    KeyError::pem(PemStage::TypeCast, error.to_string())
}

/// Elements of a DER SEQUENCE
fn sequence_elements(der: &[u8]) -> Result<Vec<AnyRef<'_>>> {
    let outer = AnyRef::from_der(der).map_err(read_error)?;
    if outer.tag() != Tag::Sequence {
        return Err(KeyError::pem(
            PemStage::TypeCast,
            format!("expected SEQUENCE, found {}", outer.tag()),
        ));
    }

    let mut reader = SliceReader::new(outer.value()).map_err(read_error)?;
    let mut elements = Vec::new();
    while !reader.is_finished() {
        elements.push(AnyRef::decode(&mut reader).map_err(read_error)?);
    }
    Ok(elements)
}

/// Curve named by an `AlgorithmIdentifier` element
fn algorithm_curve(element: AnyRef<'_>) -> Result<OkpCurve> {
    let der = element.to_der().map_err(read_error)?;
    let identifier = sequence_elements(&der)?;
    let [oid] = identifier.as_slice() else {
        return Err(KeyError::pem(
            PemStage::Asn1ElementCount,
            format!("AlgorithmIdentifier has {} elements, expected 1", identifier.len()),
        ));
    };

    let oid: ObjectIdentifier = oid.decode_as().map_err(cast_error)?;
    OkpCurve::from_oid(&oid)
        .ok_or_else(|| KeyError::pem(PemStage::TypeCast, format!("unknown OKP curve OID {oid}")))
}

/// Decode an OKP `PUBLIC KEY` or `PRIVATE KEY` document
pub(crate) fn decode_okp(der: &[u8]) -> Result<OkpDer> {
    let elements = sequence_elements(der)?;
    match elements.as_slice() {
        [algorithm, key] => {
            let curve = algorithm_curve(*algorithm)?;
            let bits: BitStringRef<'_> = key.decode_as().map_err(cast_error)?;
            let x = bits.as_bytes().ok_or_else(|| {
                KeyError::pem(PemStage::TypeCast, "public key BIT STRING is not byte aligned")
            })?;
            Ok(OkpDer::Public(curve, x.to_vec()))
        }
        [version, algorithm, key] => {
            let version: u8 = version.decode_as().map_err(cast_error)?;
            if version > 1 {
                return Err(KeyError::pem(
                    PemStage::TypeCast,
                    format!("unsupported private key version {version}"),
                ));
            }
            let curve = algorithm_curve(*algorithm)?;
            let outer: OctetStringRef<'_> = key.decode_as().map_err(cast_error)?;
            let inner = OctetStringRef::from_der(outer.as_bytes()).map_err(cast_error)?;
            Ok(OkpDer::Private(curve, inner.as_bytes().to_vec()))
        }
        other => Err(KeyError::pem(
            PemStage::Asn1ElementCount,
            format!("OKP key has {} elements, expected 2 or 3", other.len()),
        )),
    }
}

fn algorithm(curve: OkpCurve) -> AlgorithmIdentifierRef<'static> {
    AlgorithmIdentifierRef {
        oid: curve.oid(),
        parameters: None,
    }
}

fn encode_error(error: ::der::Error) -> KeyError {
    KeyError::pem(PemStage::Encode, error.to_string())
}

/// DER `SubjectPublicKeyInfo` for an OKP public key
pub(crate) fn encode_okp_public(curve: OkpCurve, x: &[u8]) -> Result<Vec<u8>> {
    let info = SubjectPublicKeyInfoRef {
        algorithm: algorithm(curve),
        subject_public_key: BitStringRef::from_bytes(x).map_err(encode_error)?,
    };
    info.to_der().map_err(encode_error)
}

/// DER `PrivateKeyInfo` (version 0) for an OKP private key
pub(crate) fn encode_okp_private(curve: OkpCurve, d: &[u8]) -> Result<Vec<u8>> {
    let inner = OctetStringRef::new(d)
        .and_then(|octets| octets.to_der())
        .map_err(encode_error)?;
    PrivateKeyInfo::new(algorithm(curve), &inner)
        .to_der()
        .map_err(encode_error)
}
