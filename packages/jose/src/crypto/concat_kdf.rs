//! Concat KDF (NIST SP 800-56A single-step KDF with SHA-256) for ECDH-ES

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

fn length_prefixed(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
}

/// Derive `key_len` bytes from the shared secret `z`
///
/// `algorithm_id` is the `enc` value for direct agreement and the `alg`
/// value when the derived key wraps a content key.
pub(crate) fn derive(
    z: &[u8],
    key_len: usize,
    algorithm_id: &str,
    apu: &[u8],
    apv: &[u8],
) -> Zeroizing<Vec<u8>> {
    let mut other_info = Vec::new();
    length_prefixed(&mut other_info, algorithm_id.as_bytes());
    length_prefixed(&mut other_info, apu);
    length_prefixed(&mut other_info, apv);
    other_info.extend_from_slice(&((key_len * 8) as u32).to_be_bytes());

    let mut derived = Zeroizing::new(Vec::with_capacity(key_len));
    let mut counter: u32 = 1;
    while derived.len() < key_len {
        let mut hasher = Sha256::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(z);
        hasher.update(&other_info);
        derived.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    derived.truncate(key_len);
    derived
}
