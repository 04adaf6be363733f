//! Cryptographic primitives behind JWS and JWE operations
//!
//! Each submodule dispatches a JOSE algorithm identifier to the RustCrypto
//! implementation and maps primitive failures into [`JoseError`](crate::JoseError).

pub(crate) mod concat_kdf;
pub(crate) mod content;
pub(crate) mod key_management;
pub(crate) mod signing;

use rand::Rng;
use zeroize::Zeroizing;

/// Fresh random bytes
pub(crate) fn random_bytes(len: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    rand::rng().fill(bytes.as_mut_slice());
    bytes
}
