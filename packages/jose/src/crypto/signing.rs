//! JWS signature creation and verification for every key family

use hmac::{Hmac, Mac};
use jwtsmith_key::{with_ec_curve, EcKey, JwsAlgorithm, Key, OkpCurve, OkpKey, RsaKey};
use rand_core::OsRng;
use rsa::{pkcs1v15, pss};
use sha2::{Sha256, Sha384, Sha512};
use signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use subtle::ConstantTimeEq;

use crate::error::{JoseError, Result};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Sign `input` with `key` under `algorithm`
pub(crate) fn sign(key: &Key, algorithm: JwsAlgorithm, input: &[u8]) -> Result<Vec<u8>> {
    if !key.can_sign() || !key.signing_algorithms().contains(&algorithm) {
        return Err(JoseError::signing(format!(
            "{} cannot sign with {algorithm}",
            key.description()
        )));
    }

    match key {
        Key::Symmetric(symmetric) => hmac_tag(symmetric.secret(), algorithm, input),
        Key::Rsa(rsa) => rsa_sign(rsa, algorithm, input),
        Key::Ec(ec) => ecdsa_sign(ec, input),
        Key::Okp(okp) => eddsa_sign(okp, input),
        Key::Password(_) => Err(JoseError::signing("password keys cannot sign")),
    }
}

/// Check `signature` over `input`; a wrong signature is `Ok(false)`
pub(crate) fn verify(
    key: &Key,
    algorithm: JwsAlgorithm,
    input: &[u8],
    signature: &[u8],
) -> Result<bool> {
    if !key.can_verify() || !key.signing_algorithms().contains(&algorithm) {
        return Err(JoseError::verification(format!(
            "{} cannot verify {algorithm}",
            key.description()
        )));
    }

    match key {
        Key::Symmetric(symmetric) => Ok(hmac_verify(symmetric.secret(), algorithm, input, signature)),
        Key::Rsa(rsa) => Ok(rsa_verify(rsa, algorithm, input, signature)),
        Key::Ec(ec) => ecdsa_verify(ec, input, signature),
        Key::Okp(okp) => eddsa_verify(okp, input, signature),
        Key::Password(_) => Err(JoseError::verification("password keys cannot verify")),
    }
}

fn hmac_tag(secret: &[u8], algorithm: JwsAlgorithm, input: &[u8]) -> Result<Vec<u8>> {
    match algorithm {
        JwsAlgorithm::Hs256 => mac::<HmacSha256>(secret, input),
        JwsAlgorithm::Hs384 => mac::<HmacSha384>(secret, input),
        JwsAlgorithm::Hs512 => mac::<HmacSha512>(secret, input),
        other => Err(JoseError::signing(format!("{other} is not an HMAC algorithm"))),
    }
}

fn mac<M: Mac + hmac::digest::KeyInit>(secret: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| JoseError::signing(format!("HMAC key error: {e}")))?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Recompute an HMAC tag and compare in constant time
pub(crate) fn hmac_verify(
    secret: &[u8],
    algorithm: JwsAlgorithm,
    input: &[u8],
    signature: &[u8],
) -> bool {
    hmac_tag(secret, algorithm, input).is_ok_and(|expected| {
        expected.len() == signature.len() && bool::from(expected.ct_eq(signature))
    })
}

macro_rules! rsa_pkcs1v15_sign {
    ($digest:ty, $private:expr, $input:expr) => {
        pkcs1v15::SigningKey::<$digest>::new($private.clone())
            .try_sign($input)
            .map(|signature| signature.to_vec())
    };
}

macro_rules! rsa_pss_sign {
    ($digest:ty, $private:expr, $input:expr) => {
        pss::BlindedSigningKey::<$digest>::new($private.clone())
            .try_sign_with_rng(&mut OsRng, $input)
            .map(|signature| signature.to_vec())
    };
}

macro_rules! rsa_pkcs1v15_verify {
    ($digest:ty, $public:expr, $input:expr, $signature:expr) => {
        pkcs1v15::Signature::try_from($signature).is_ok_and(|signature| {
            pkcs1v15::VerifyingKey::<$digest>::new($public.clone())
                .verify($input, &signature)
                .is_ok()
        })
    };
}

macro_rules! rsa_pss_verify {
    ($digest:ty, $public:expr, $input:expr, $signature:expr) => {
        pss::Signature::try_from($signature).is_ok_and(|signature| {
            pss::VerifyingKey::<$digest>::new($public.clone())
                .verify($input, &signature)
                .is_ok()
        })
    };
}

fn rsa_sign(key: &RsaKey, algorithm: JwsAlgorithm, input: &[u8]) -> Result<Vec<u8>> {
    let private = key
        .private_key()
        .ok_or_else(|| JoseError::signing("RSA key has no private part"))?;

    let signature = match algorithm {
        JwsAlgorithm::Rs256 => rsa_pkcs1v15_sign!(Sha256, private, input),
        JwsAlgorithm::Rs384 => rsa_pkcs1v15_sign!(Sha384, private, input),
        JwsAlgorithm::Rs512 => rsa_pkcs1v15_sign!(Sha512, private, input),
        JwsAlgorithm::Ps256 => rsa_pss_sign!(Sha256, private, input),
        JwsAlgorithm::Ps384 => rsa_pss_sign!(Sha384, private, input),
        JwsAlgorithm::Ps512 => rsa_pss_sign!(Sha512, private, input),
        other => return Err(JoseError::signing(format!("{other} is not an RSA algorithm"))),
    };

    signature.map_err(|e| JoseError::signing(e.to_string()))
}

fn rsa_verify(key: &RsaKey, algorithm: JwsAlgorithm, input: &[u8], signature: &[u8]) -> bool {
    let public = key.public_key();
    match algorithm {
        JwsAlgorithm::Rs256 => rsa_pkcs1v15_verify!(Sha256, public, input, signature),
        JwsAlgorithm::Rs384 => rsa_pkcs1v15_verify!(Sha384, public, input, signature),
        JwsAlgorithm::Rs512 => rsa_pkcs1v15_verify!(Sha512, public, input, signature),
        JwsAlgorithm::Ps256 => rsa_pss_verify!(Sha256, public, input, signature),
        JwsAlgorithm::Ps384 => rsa_pss_verify!(Sha384, public, input, signature),
        JwsAlgorithm::Ps512 => rsa_pss_verify!(Sha512, public, input, signature),
        _ => false,
    }
}

/// ECDSA with the curve's JOSE digest, fixed-size `r‖s` output
fn ecdsa_sign(key: &EcKey, input: &[u8]) -> Result<Vec<u8>> {
    let d = key
        .d()
        .ok_or_else(|| JoseError::signing("EC key has no private part"))?;

    with_ec_curve!(key.curve(), c => {
        let signing_key = c::ecdsa::SigningKey::from_slice(d)
            .map_err(|e| JoseError::signing(e.to_string()))?;
        let signature: c::ecdsa::Signature = signing_key
            .try_sign(input)
            .map_err(|e| JoseError::signing(e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    })
}

fn ecdsa_verify(key: &EcKey, input: &[u8], signature: &[u8]) -> Result<bool> {
    let point = key.sec1_point();

    with_ec_curve!(key.curve(), c => {
        let verifying_key = c::ecdsa::VerifyingKey::from_sec1_bytes(&point)
            .map_err(|e| JoseError::verification(e.to_string()))?;
        // (r, s) and (r, n - s) are both valid; k256 only accepts the low-S form
        Ok(c::ecdsa::Signature::from_slice(signature).is_ok_and(|signature| {
            let signature = signature.normalize_s().unwrap_or(signature);
            verifying_key.verify(input, &signature).is_ok()
        }))
    })
}

fn eddsa_sign(key: &OkpKey, input: &[u8]) -> Result<Vec<u8>> {
    let d = key
        .d()
        .ok_or_else(|| JoseError::signing("OKP key has no private part"))?;

    match key.curve() {
        OkpCurve::Ed25519 => {
            let secret: [u8; 32] = d
                .try_into()
                .map_err(|_| JoseError::signing("Ed25519 private key must be 32 bytes"))?;
            let signing_key = ed25519_dalek::SigningKey::from_bytes(&secret);
            Ok(signing_key.sign(input).to_bytes().to_vec())
        }
        OkpCurve::Ed448 => {
            let signing_key = ed448_goldilocks_plus::SigningKey::try_from(d)
                .map_err(|_| JoseError::signing("Ed448 private key must be 57 bytes"))?;
            Ok(signing_key.sign_raw(input).to_bytes().to_vec())
        }
        curve => Err(JoseError::signing(format!("{curve} cannot sign"))),
    }
}

fn eddsa_verify(key: &OkpKey, input: &[u8], signature: &[u8]) -> Result<bool> {
    match key.curve() {
        OkpCurve::Ed25519 => {
            let public: [u8; 32] = key
                .x()
                .try_into()
                .map_err(|_| JoseError::verification("Ed25519 public key must be 32 bytes"))?;
            let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&public)
                .map_err(|e| JoseError::verification(e.to_string()))?;
            Ok(ed25519_dalek::Signature::from_slice(signature)
                .is_ok_and(|signature| verifying_key.verify(input, &signature).is_ok()))
        }
        OkpCurve::Ed448 => {
            let public: [u8; 57] = key
                .x()
                .try_into()
                .map_err(|_| JoseError::verification("Ed448 public key must be 57 bytes"))?;
            let verifying_key = ed448_goldilocks_plus::VerifyingKey::from_bytes(&public)
                .map_err(|e| JoseError::verification(e.to_string()))?;
            Ok(ed448_goldilocks_plus::Signature::try_from(signature)
                .is_ok_and(|signature| verifying_key.verify_raw(&signature, input).is_ok()))
        }
        curve => Err(JoseError::verification(format!("{curve} cannot verify"))),
    }
}
