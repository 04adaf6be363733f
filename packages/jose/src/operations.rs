//! Sign, verify, encrypt and decrypt JOSE objects with a [`Key`]

use std::str::FromStr;

use jwtsmith_key::{EncryptionMethod, JweAlgorithm, JwsAlgorithm, Key};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::crypto::{content, key_management, random_bytes, signing};
use crate::error::{JoseError, Result};
use crate::header::Header;
use crate::jwe::Jwe;
use crate::jws::Jws;
use crate::segment::Base64Segment;

/// How the protected header is rewritten before signing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderUpdate {
    /// Sign the header exactly as it is
    #[default]
    Unchanged,
    /// Move `alg` to the end with the signing algorithm
    AlgorithmOnly,
    /// Move `kid`, `typ` and `alg` to the end, taken from the key and algorithm
    AlgorithmTypeAndKeyId,
}

/// Rewrite `header` for signing under `algorithm` with a key identified by `key_id`
///
/// Rewritten members are removed and appended, so they always end up last
/// and in `kid`, `typ`, `alg` order. A header that is not a JSON object is
/// replaced by an empty one before the rewrite.
pub fn update_header(
    header: &Header,
    key_id: Option<&str>,
    algorithm: JwsAlgorithm,
    update: HeaderUpdate,
) -> Result<Header> {
    let mut members = match update {
        HeaderUpdate::Unchanged => return Ok(header.clone()),
        HeaderUpdate::AlgorithmOnly | HeaderUpdate::AlgorithmTypeAndKeyId => header.json(),
    };

    if update == HeaderUpdate::AlgorithmTypeAndKeyId {
        members.shift_remove("kid");
        members.shift_remove("typ");
        if let Some(kid) = key_id {
            members.insert("kid".into(), kid.into());
        }
        members.insert("typ".into(), "JWT".into());
    }
    members.shift_remove("alg");
    members.insert("alg".into(), algorithm.name().into());

    Header::from_json(&members)
}

/// Sign `jws` again with `key`, rewriting the header as requested
pub fn sign(jws: &Jws, key: &Key, algorithm: JwsAlgorithm, update: HeaderUpdate) -> Result<Jws> {
    let header = update_header(jws.header(), key.key_id(), algorithm, update)?;
    sign_parts(key, algorithm, header.encoded(), jws.claims().encoded())
}

/// Sign raw base64url header and payload segments
pub fn sign_parts(key: &Key, algorithm: JwsAlgorithm, header: &str, payload: &str) -> Result<Jws> {
    let header = Base64Segment::parse(header)?;
    let payload = Base64Segment::parse(payload)?;
    let input = format!("{}.{}", header.encoded(), payload.encoded());

    let signature = signing::sign(key, algorithm, input.as_bytes()).inspect_err(|e| {
        warn!(key = %key, %algorithm, error = %e, "signing failed");
    })?;
    debug!(key = %key, %algorithm, "signed JWS");

    Ok(Jws::from_segments(
        header,
        payload,
        Base64Segment::encode(signature),
    ))
}

/// Check the signature of `jws` with `key` under `algorithm`
///
/// A wrong signature is `Ok(false)`; a key that cannot verify `algorithm`
/// is a [`JoseError::Verification`].
pub fn verify(jws: &Jws, key: &Key, algorithm: JwsAlgorithm) -> Result<bool> {
    let valid = signing::verify(
        key,
        algorithm,
        jws.signing_input().as_bytes(),
        jws.signature().decoded(),
    )?;
    debug!(key = %key, %algorithm, valid, "verified JWS");
    Ok(valid)
}

/// Check the signature using the algorithm named in the header
pub fn verify_with_header_algorithm(jws: &Jws, key: &Key) -> Result<bool> {
    let algorithm = JwsAlgorithm::from_str(&jws.header().algorithm())
        .map_err(|e| JoseError::verification(e.to_string()))?;
    verify(jws, key, algorithm)
}

/// Encrypt the compact form of `jws` for `key`
///
/// The header holds `enc`, `alg` and then whatever parameters the key
/// management algorithm produced.
pub fn encrypt(jws: &Jws, key: &Key, kek: JweAlgorithm, cek: EncryptionMethod) -> Result<Jwe> {
    let wrapped = key_management::wrap(key, kek, cek)?;

    let mut members = Map::new();
    members.insert("enc".into(), Value::from(cek.name()));
    members.insert("alg".into(), Value::from(kek.name()));
    members.extend(wrapped.header);
    let header = Header::from_json(&members)?;

    let iv = random_bytes(content::iv_len(cek));
    let sealed = content::encrypt(
        cek,
        &wrapped.cek,
        &iv,
        header.encoded().as_bytes(),
        jws.serialize().as_bytes(),
    )?;
    debug!(key = %key, alg = %kek, enc = %cek, "encrypted JWS");

    Ok(Jwe::from_segments(
        header.segment().clone(),
        Base64Segment::encode(&wrapped.encrypted_key),
        Base64Segment::encode(iv.as_slice()),
        Base64Segment::encode(&sealed.ciphertext),
        Base64Segment::encode(&sealed.tag),
    ))
}

/// Decrypt `jwe` with `key`; the plaintext must be a compact JWS
pub fn decrypt(jwe: &Jwe, key: &Key) -> Result<Jws> {
    let header = jwe.header();
    let algorithm = header
        .string_member("alg")
        .ok_or_else(|| JoseError::decryption("missing alg"))
        .and_then(|alg| {
            JweAlgorithm::from_str(&alg).map_err(|e| JoseError::decryption(e.to_string()))
        })?;
    let method = header
        .string_member("enc")
        .ok_or_else(|| JoseError::decryption("missing enc"))
        .and_then(|enc| {
            EncryptionMethod::from_str(&enc).map_err(|e| JoseError::decryption(e.to_string()))
        })?;

    let cek = key_management::unwrap(
        key,
        algorithm,
        method,
        &header.json(),
        jwe.encrypted_key().decoded(),
    )?;
    let plaintext = content::decrypt(
        method,
        &cek,
        jwe.iv().decoded(),
        header.encoded().as_bytes(),
        jwe.ciphertext().decoded(),
        jwe.tag().decoded(),
    )?;
    debug!(key = %key, %algorithm, %method, "decrypted JWE");

    String::from_utf8(plaintext)
        .ok()
        .and_then(|text| Jws::parse(&text).ok())
        .ok_or_else(|| JoseError::decryption("JWE contents are not a JWS"))
}
