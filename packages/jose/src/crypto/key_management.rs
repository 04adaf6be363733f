//! JWE key management: how the content encryption key (CEK) reaches the recipient
//!
//! [`wrap`] produces a CEK, the encrypted key segment and any header
//! parameters the algorithm needs (`epk`, `p2s`/`p2c`, `iv`/`tag`).
//! [`unwrap`] reverses it from the received header and encrypted key.

use jwtsmith_common::encoding::base64url;
use jwtsmith_key::{
    with_ec_curve, EcCurve, EcKey, EncryptionMethod, JweAlgorithm, Key, OkpCurve, OkpKey, RsaKey,
};
use rand_core::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt};
use serde_json::{Map, Value};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::{concat_kdf, content, random_bytes};
use crate::error::{JoseError, Result};

type Step<T> = std::result::Result<T, String>;

/// Highest PBES2 iteration count accepted from a received header
pub(crate) const MAX_PBES2_COUNT: u32 = 1_000_000;

/// CEK plus what the recipient needs to recover it
pub(crate) struct WrappedKey {
    pub(crate) cek: Zeroizing<Vec<u8>>,
    pub(crate) encrypted_key: Vec<u8>,
    pub(crate) header: Map<String, Value>,
}

/// Establish a CEK for `method` under `algorithm`
pub(crate) fn wrap(
    key: &Key,
    algorithm: JweAlgorithm,
    method: EncryptionMethod,
) -> Result<WrappedKey> {
    if !key.can_encrypt() || !key.key_encryption_algorithms().contains(&algorithm) {
        return Err(JoseError::encryption(format!(
            "{} cannot encrypt with {algorithm}",
            key.description()
        )));
    }
    if !key.content_encryption_algorithms(algorithm).contains(&method) {
        return Err(JoseError::encryption(format!(
            "{} cannot use {method} with {algorithm}",
            key.description()
        )));
    }

    wrap_step(key, algorithm, method).map_err(JoseError::Encryption)
}

/// Recover the CEK from a received header and encrypted key
pub(crate) fn unwrap(
    key: &Key,
    algorithm: JweAlgorithm,
    method: EncryptionMethod,
    header: &Map<String, Value>,
    encrypted_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if !key.can_decrypt() || !key.key_encryption_algorithms().contains(&algorithm) {
        return Err(JoseError::decryption(format!(
            "{} cannot decrypt {algorithm}",
            key.description()
        )));
    }

    let cek = unwrap_step(key, algorithm, method, header, encrypted_key)
        .map_err(JoseError::Decryption)?;
    if cek.len() != method.key_len() {
        return Err(JoseError::decryption(format!(
            "{method} needs a {} byte key, recovered {}",
            method.key_len(),
            cek.len()
        )));
    }
    Ok(cek)
}

fn wrap_step(key: &Key, algorithm: JweAlgorithm, method: EncryptionMethod) -> Step<WrappedKey> {
    let mut header = Map::new();

    let (cek, encrypted_key) = match algorithm {
        JweAlgorithm::Dir => {
            let secret = symmetric_secret(key)?;
            if secret.len() != method.key_len() {
                return Err(format!("{method} needs a {} byte key", method.key_len()));
            }
            (Zeroizing::new(secret.to_vec()), Vec::new())
        }
        JweAlgorithm::A128Kw | JweAlgorithm::A192Kw | JweAlgorithm::A256Kw => {
            let cek = random_bytes(method.key_len());
            let wrapped = aes_key_wrap(symmetric_secret(key)?, &cek)?;
            (cek, wrapped)
        }
        JweAlgorithm::A128GcmKw | JweAlgorithm::A192GcmKw | JweAlgorithm::A256GcmKw => {
            let cek = random_bytes(method.key_len());
            let kek = symmetric_secret(key)?;
            let iv = random_bytes(content::iv_len(EncryptionMethod::A128Gcm));
            let sealed = content::encrypt(gcm_for(kek)?, kek, &iv, &[], &cek)
                .map_err(|e| e.to_string())?;
            header.insert("iv".into(), base64url::encode(iv.as_slice()).into());
            header.insert("tag".into(), base64url::encode(&sealed.tag).into());
            (cek, sealed.ciphertext)
        }
        JweAlgorithm::Rsa1_5 | JweAlgorithm::RsaOaep | JweAlgorithm::RsaOaep256 => {
            let Key::Rsa(rsa) = key else {
                return Err(format!("{algorithm} needs an RSA key"));
            };
            let cek = random_bytes(method.key_len());
            let encrypted = rsa_encrypt(rsa, algorithm, &cek)?;
            (cek, encrypted)
        }
        JweAlgorithm::EcdhEs
        | JweAlgorithm::EcdhEsA128Kw
        | JweAlgorithm::EcdhEsA192Kw
        | JweAlgorithm::EcdhEsA256Kw => {
            let (z, epk) = ephemeral_agreement(key)?;
            header.insert("epk".into(), epk);
            let derived = ecdh_derive(&z, algorithm, method, &[], &[]);
            match algorithm.wrapping_key_len() {
                None => (derived, Vec::new()),
                Some(_) => {
                    let cek = random_bytes(method.key_len());
                    let wrapped = aes_key_wrap(&derived, &cek)?;
                    (cek, wrapped)
                }
            }
        }
        JweAlgorithm::Pbes2Hs256A128Kw
        | JweAlgorithm::Pbes2Hs384A192Kw
        | JweAlgorithm::Pbes2Hs512A256Kw => {
            let Key::Password(password) = key else {
                return Err(format!("{algorithm} needs a password key"));
            };
            let p2s = random_bytes(password.salt_length());
            let p2c = password.iterations();
            let kek = pbes2_kek(algorithm, password.password().as_bytes(), &p2s, p2c)?;
            let cek = random_bytes(method.key_len());
            let wrapped = aes_key_wrap(&kek, &cek)?;
            header.insert("p2s".into(), base64url::encode(p2s.as_slice()).into());
            header.insert("p2c".into(), p2c.into());
            (cek, wrapped)
        }
    };

    Ok(WrappedKey {
        cek,
        encrypted_key,
        header,
    })
}

fn unwrap_step(
    key: &Key,
    algorithm: JweAlgorithm,
    method: EncryptionMethod,
    header: &Map<String, Value>,
    encrypted_key: &[u8],
) -> Step<Zeroizing<Vec<u8>>> {
    match algorithm {
        // The encrypted key segment is ignored for direct encryption
        JweAlgorithm::Dir => Ok(Zeroizing::new(symmetric_secret(key)?.to_vec())),
        JweAlgorithm::A128Kw | JweAlgorithm::A192Kw | JweAlgorithm::A256Kw => {
            aes_key_unwrap(symmetric_secret(key)?, encrypted_key)
        }
        JweAlgorithm::A128GcmKw | JweAlgorithm::A192GcmKw | JweAlgorithm::A256GcmKw => {
            let kek = symmetric_secret(key)?;
            let iv = header_bytes(header, "iv")?;
            let tag = header_bytes(header, "tag")?;
            content::decrypt(gcm_for(kek)?, kek, &iv, &[], encrypted_key, &tag)
                .map(Zeroizing::new)
                .map_err(|e| e.to_string())
        }
        JweAlgorithm::Rsa1_5 | JweAlgorithm::RsaOaep | JweAlgorithm::RsaOaep256 => {
            let Key::Rsa(rsa) = key else {
                return Err(format!("{algorithm} needs an RSA key"));
            };
            rsa_decrypt(rsa, algorithm, encrypted_key)
        }
        JweAlgorithm::EcdhEs
        | JweAlgorithm::EcdhEsA128Kw
        | JweAlgorithm::EcdhEsA192Kw
        | JweAlgorithm::EcdhEsA256Kw => {
            let epk = header
                .get("epk")
                .ok_or_else(|| "missing epk header parameter".to_string())?;
            let epk = Key::from_jwk(epk).map_err(|e| format!("invalid epk: {e}"))?;
            let z = static_agreement(key, &epk)?;
            let apu = optional_header_bytes(header, "apu")?;
            let apv = optional_header_bytes(header, "apv")?;
            let derived = ecdh_derive(&z, algorithm, method, &apu, &apv);
            match algorithm.wrapping_key_len() {
                None => Ok(derived),
                Some(_) => aes_key_unwrap(&derived, encrypted_key),
            }
        }
        JweAlgorithm::Pbes2Hs256A128Kw
        | JweAlgorithm::Pbes2Hs384A192Kw
        | JweAlgorithm::Pbes2Hs512A256Kw => {
            let Key::Password(password) = key else {
                return Err(format!("{algorithm} needs a password key"));
            };
            let p2s = header_bytes(header, "p2s")?;
            let p2c = header
                .get("p2c")
                .and_then(Value::as_u64)
                .and_then(|count| u32::try_from(count).ok())
                .filter(|&count| count > 0)
                .ok_or_else(|| "missing or invalid p2c header parameter".to_string())?;
            if p2c > MAX_PBES2_COUNT {
                return Err(format!(
                    "p2c of {p2c} exceeds the limit of {MAX_PBES2_COUNT} iterations"
                ));
            }
            let kek = pbes2_kek(algorithm, password.password().as_bytes(), &p2s, p2c)?;
            aes_key_unwrap(&kek, encrypted_key)
        }
    }
}

fn symmetric_secret(key: &Key) -> Step<&[u8]> {
    match key {
        Key::Symmetric(symmetric) => Ok(symmetric.secret()),
        other => Err(format!("{} is not a symmetric key", other.description())),
    }
}

fn header_bytes(header: &Map<String, Value>, name: &str) -> Step<Vec<u8>> {
    let text = header
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {name} header parameter"))?;
    base64url::decode(text).map_err(|e| format!("invalid {name}: {e}"))
}

fn optional_header_bytes(header: &Map<String, Value>, name: &str) -> Step<Vec<u8>> {
    if header.contains_key(name) {
        header_bytes(header, name)
    } else {
        Ok(Vec::new())
    }
}

/// AES-GCM method keyed by a key-wrapping key of this length
fn gcm_for(kek: &[u8]) -> Step<EncryptionMethod> {
    match kek.len() {
        16 => Ok(EncryptionMethod::A128Gcm),
        24 => Ok(EncryptionMethod::A192Gcm),
        32 => Ok(EncryptionMethod::A256Gcm),
        n => Err(format!("no AES key of {n} bytes")),
    }
}

/// RFC 3394 key wrap
fn aes_key_wrap(kek: &[u8], cek: &[u8]) -> Step<Vec<u8>> {
    use aes::cipher::generic_array::GenericArray;

    let wrapped = match kek.len() {
        16 => aes_kw::KekAes128::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        24 => aes_kw::KekAes192::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        32 => aes_kw::KekAes256::new(GenericArray::from_slice(kek)).wrap_vec(cek),
        n => return Err(format!("no AES key of {n} bytes")),
    };
    wrapped.map_err(|e| e.to_string())
}

fn aes_key_unwrap(kek: &[u8], wrapped: &[u8]) -> Step<Zeroizing<Vec<u8>>> {
    use aes::cipher::generic_array::GenericArray;

    let cek = match kek.len() {
        16 => aes_kw::KekAes128::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        24 => aes_kw::KekAes192::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        32 => aes_kw::KekAes256::new(GenericArray::from_slice(kek)).unwrap_vec(wrapped),
        n => return Err(format!("no AES key of {n} bytes")),
    };
    cek.map(Zeroizing::new).map_err(|e| e.to_string())
}

fn rsa_encrypt(key: &RsaKey, algorithm: JweAlgorithm, cek: &[u8]) -> Step<Vec<u8>> {
    let public = key.public_key();
    let mut rng = OsRng;
    let encrypted = match algorithm {
        JweAlgorithm::Rsa1_5 => public.encrypt(&mut rng, Pkcs1v15Encrypt, cek),
        JweAlgorithm::RsaOaep => public.encrypt(&mut rng, Oaep::new::<sha1::Sha1>(), cek),
        JweAlgorithm::RsaOaep256 => public.encrypt(&mut rng, Oaep::new::<Sha256>(), cek),
        other => return Err(format!("{other} is not an RSA algorithm")),
    };
    encrypted.map_err(|e| e.to_string())
}

fn rsa_decrypt(key: &RsaKey, algorithm: JweAlgorithm, encrypted: &[u8]) -> Step<Zeroizing<Vec<u8>>> {
    let private = key
        .private_key()
        .ok_or_else(|| "RSA key has no private part".to_string())?;
    let cek = match algorithm {
        JweAlgorithm::Rsa1_5 => private.decrypt(Pkcs1v15Encrypt, encrypted),
        JweAlgorithm::RsaOaep => private.decrypt(Oaep::new::<sha1::Sha1>(), encrypted),
        JweAlgorithm::RsaOaep256 => private.decrypt(Oaep::new::<Sha256>(), encrypted),
        other => return Err(format!("{other} is not an RSA algorithm")),
    };
    cek.map(Zeroizing::new).map_err(|e| e.to_string())
}

/// Concat KDF keyed on `enc` for direct agreement and on `alg` when wrapping
fn ecdh_derive(
    z: &[u8],
    algorithm: JweAlgorithm,
    method: EncryptionMethod,
    apu: &[u8],
    apv: &[u8],
) -> Zeroizing<Vec<u8>> {
    match algorithm.wrapping_key_len() {
        None => concat_kdf::derive(z, method.key_len(), method.name(), apu, apv),
        Some(len) => concat_kdf::derive(z, len, algorithm.name(), apu, apv),
    }
}

/// Generate an ephemeral key on the recipient's curve and agree with it
fn ephemeral_agreement(recipient: &Key) -> Step<(Zeroizing<Vec<u8>>, Value)> {
    let ephemeral = match recipient {
        Key::Ec(ec) => {
            let curve = ec.curve();
            let d = with_ec_curve!(curve, c => {
                Zeroizing::new(c::SecretKey::random(&mut OsRng).to_bytes().to_vec())
            });
            Key::Ec(EcKey::from_private_scalar(curve, &d, None).map_err(|e| e.to_string())?)
        }
        Key::Okp(okp) => {
            let curve = okp.curve();
            let d = random_bytes(curve.key_len());
            Key::Okp(OkpKey::from_private(curve, &d, None).map_err(|e| e.to_string())?)
        }
        other => return Err(format!("{} cannot perform ECDH-ES", other.description())),
    };

    let epk = ephemeral.to_jwk(false).map_err(|e| e.to_string())?;
    let z = static_agreement(&ephemeral, recipient)?;
    Ok((z, epk))
}

/// Shared secret between a private key and a peer's public key on the same curve
fn static_agreement(private: &Key, peer: &Key) -> Step<Zeroizing<Vec<u8>>> {
    match (private, peer) {
        (Key::Ec(private), Key::Ec(peer)) if private.curve() == peer.curve() => {
            let d = private
                .d()
                .ok_or_else(|| "EC key has no private part".to_string())?;
            ec_agreement(private.curve(), d, &peer.sec1_point())
        }
        (Key::Okp(private), Key::Okp(peer)) if private.curve() == peer.curve() => {
            let d = private
                .d()
                .ok_or_else(|| "OKP key has no private part".to_string())?;
            okp_agreement(private.curve(), d, peer.x())
        }
        _ => Err(format!(
            "cannot agree between {} and {}",
            private.description(),
            peer.description()
        )),
    }
}

fn ec_agreement(curve: EcCurve, d: &[u8], point: &[u8]) -> Step<Zeroizing<Vec<u8>>> {
    with_ec_curve!(curve, c => {
        let secret = c::SecretKey::from_slice(d).map_err(|e| e.to_string())?;
        let public = c::PublicKey::from_sec1_bytes(point).map_err(|e| e.to_string())?;
        let shared =
            elliptic_curve::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
        Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
    })
}

fn okp_agreement(curve: OkpCurve, d: &[u8], x: &[u8]) -> Step<Zeroizing<Vec<u8>>> {
    match curve {
        OkpCurve::X25519 => {
            let scalar: [u8; 32] = d
                .try_into()
                .map_err(|_| "X25519 private keys are 32 bytes".to_string())?;
            let point: [u8; 32] = x
                .try_into()
                .map_err(|_| "X25519 public keys are 32 bytes".to_string())?;
            let secret = x25519_dalek::StaticSecret::from(scalar);
            let shared = secret.diffie_hellman(&x25519_dalek::PublicKey::from(point));
            Ok(Zeroizing::new(shared.as_bytes().to_vec()))
        }
        OkpCurve::X448 => {
            let secret = x448::Secret::from_bytes(d)
                .ok_or_else(|| "X448 private keys are 56 bytes".to_string())?;
            let public = x448::PublicKey::from_bytes(x)
                .ok_or_else(|| "invalid X448 public key".to_string())?;
            let shared = secret
                .as_diffie_hellman(&public)
                .ok_or_else(|| "X448 agreement produced a low order point".to_string())?;
            Ok(Zeroizing::new(shared.as_bytes().to_vec()))
        }
        other => Err(format!("{other} cannot perform key agreement")),
    }
}

/// PBKDF2 key-wrapping key; the salt is `alg ‖ 0x00 ‖ p2s`
fn pbes2_kek(
    algorithm: JweAlgorithm,
    password: &[u8],
    p2s: &[u8],
    p2c: u32,
) -> Step<Zeroizing<Vec<u8>>> {
    let len = algorithm
        .wrapping_key_len()
        .ok_or_else(|| format!("{algorithm} is not a PBES2 algorithm"))?;

    let mut salt = algorithm.name().as_bytes().to_vec();
    salt.push(0);
    salt.extend_from_slice(p2s);

    let mut kek = Zeroizing::new(vec![0u8; len]);
    match algorithm {
        JweAlgorithm::Pbes2Hs256A128Kw => pbkdf2::pbkdf2_hmac::<Sha256>(password, &salt, p2c, &mut kek),
        JweAlgorithm::Pbes2Hs384A192Kw => pbkdf2::pbkdf2_hmac::<Sha384>(password, &salt, p2c, &mut kek),
        JweAlgorithm::Pbes2Hs512A256Kw => pbkdf2::pbkdf2_hmac::<Sha512>(password, &salt, p2c, &mut kek),
        other => return Err(format!("{other} is not a PBES2 algorithm")),
    }
    Ok(kek)
}
