//! Content encryption: AES-GCM and AES-CBC with HMAC-SHA2

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{AeadInPlace, Nonce, Tag};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use hmac::{Hmac, Mac};
use jwtsmith_key::EncryptionMethod;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{JoseError, Result};

type Aes192Gcm = AesGcm<Aes192, U12>;

const GCM_IV_LEN: usize = 12;
const GCM_TAG_LEN: usize = 16;
const CBC_IV_LEN: usize = 16;

/// Ciphertext and authentication tag
pub(crate) struct Sealed {
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) tag: Vec<u8>,
}

/// IV length the method expects
pub(crate) fn iv_len(method: EncryptionMethod) -> usize {
    if method.is_gcm() {
        GCM_IV_LEN
    } else {
        CBC_IV_LEN
    }
}

/// Encrypt and authenticate `plaintext` together with `aad`
pub(crate) fn encrypt(
    method: EncryptionMethod,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    check_lengths(method, cek, iv, JoseError::Encryption)?;

    match method {
        EncryptionMethod::A128Gcm => gcm_seal::<Aes128Gcm>(cek, iv, aad, plaintext),
        EncryptionMethod::A192Gcm => gcm_seal::<Aes192Gcm>(cek, iv, aad, plaintext),
        EncryptionMethod::A256Gcm => gcm_seal::<Aes256Gcm>(cek, iv, aad, plaintext),
        EncryptionMethod::A128CbcHs256 => {
            cbc_hmac_seal::<Aes128, Hmac<Sha256>>(cek, iv, aad, plaintext)
        }
        EncryptionMethod::A192CbcHs384 => {
            cbc_hmac_seal::<Aes192, Hmac<Sha384>>(cek, iv, aad, plaintext)
        }
        EncryptionMethod::A256CbcHs512 => {
            cbc_hmac_seal::<Aes256, Hmac<Sha512>>(cek, iv, aad, plaintext)
        }
    }
}

/// Check the tag and decrypt
pub(crate) fn decrypt(
    method: EncryptionMethod,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    check_lengths(method, cek, iv, JoseError::Decryption)?;

    match method {
        EncryptionMethod::A128Gcm => gcm_open::<Aes128Gcm>(cek, iv, aad, ciphertext, tag),
        EncryptionMethod::A192Gcm => gcm_open::<Aes192Gcm>(cek, iv, aad, ciphertext, tag),
        EncryptionMethod::A256Gcm => gcm_open::<Aes256Gcm>(cek, iv, aad, ciphertext, tag),
        EncryptionMethod::A128CbcHs256 => {
            cbc_hmac_open::<Aes128, Hmac<Sha256>>(cek, iv, aad, ciphertext, tag)
        }
        EncryptionMethod::A192CbcHs384 => {
            cbc_hmac_open::<Aes192, Hmac<Sha384>>(cek, iv, aad, ciphertext, tag)
        }
        EncryptionMethod::A256CbcHs512 => {
            cbc_hmac_open::<Aes256, Hmac<Sha512>>(cek, iv, aad, ciphertext, tag)
        }
    }
}

fn check_lengths(
    method: EncryptionMethod,
    cek: &[u8],
    iv: &[u8],
    error: fn(String) -> JoseError,
) -> Result<()> {
    if cek.len() != method.key_len() {
        return Err(error(format!(
            "{method} needs a {} byte key, got {}",
            method.key_len(),
            cek.len()
        )));
    }
    if iv.len() != iv_len(method) {
        return Err(error(format!(
            "{method} needs a {} byte IV, got {}",
            iv_len(method),
            iv.len()
        )));
    }
    Ok(())
}

fn gcm_seal<C: AeadInPlace + KeyInit>(
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed> {
    let cipher = C::new_from_slice(cek).map_err(|e| JoseError::encryption(e.to_string()))?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(iv), aad, &mut buffer)
        .map_err(|e| JoseError::encryption(e.to_string()))?;

    Ok(Sealed {
        ciphertext: buffer,
        tag: tag.to_vec(),
    })
}

fn gcm_open<C: AeadInPlace + KeyInit>(
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    if tag.len() != GCM_TAG_LEN {
        return Err(JoseError::decryption("AES-GCM tag must be 16 bytes"));
    }

    let cipher = C::new_from_slice(cek).map_err(|e| JoseError::decryption(e.to_string()))?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::<C>::from_slice(iv),
            aad,
            &mut buffer,
            Tag::<C>::from_slice(tag),
        )
        .map_err(|_| JoseError::decryption("AES-GCM authentication failed"))?;

    Ok(buffer)
}

/// RFC 7518 section 5.2: the first half of the key authenticates, the second encrypts
fn cbc_hmac_seal<C, M>(cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Sealed>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
    M: Mac + KeyInit,
{
    let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
    let ciphertext = cbc::Encryptor::<C>::new_from_slices(enc_key, iv)
        .map_err(|e| JoseError::encryption(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let tag = cbc_hmac_tag::<M>(mac_key, aad, iv, &ciphertext)?;

    Ok(Sealed { ciphertext, tag })
}

fn cbc_hmac_open<C, M>(
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
    M: Mac + KeyInit,
{
    let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
    let expected = cbc_hmac_tag::<M>(mac_key, aad, iv, ciphertext)
        .map_err(|e| JoseError::decryption(e.to_string()))?;
    if expected.len() != tag.len() || !bool::from(expected.ct_eq(tag)) {
        return Err(JoseError::decryption("AES-CBC-HMAC authentication failed"));
    }

    cbc::Decryptor::<C>::new_from_slices(enc_key, iv)
        .map_err(|e| JoseError::decryption(e.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| JoseError::decryption("invalid padding"))
}

/// HMAC over `aad ‖ iv ‖ ciphertext ‖ AL`, truncated to half the MAC output
fn cbc_hmac_tag<M: Mac + KeyInit>(
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let aad_bits = (aad.len() as u64) * 8;

    let mut mac = <M as Mac>::new_from_slice(mac_key)
        .map_err(|e| JoseError::encryption(e.to_string()))?;
    mac.update(aad);
    mac.update(iv);
    mac.update(ciphertext);
    mac.update(&aad_bits.to_be_bytes());

    let full = mac.finalize().into_bytes();
    Ok(full[..full.len() / 2].to_vec())
}
