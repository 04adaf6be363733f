//! # jwtsmith keys
//!
//! Key material for JOSE operations behind one capability model.
//!
//! ## Features
//!
//! - **Capability model**: symmetric, RSA, EC, OKP and password keys answer
//!   the same sign/verify/encrypt/decrypt questions
//! - **JSON Web Keys**: import, export with stable member order, JWK Set import
//! - **PEM**: RSA, EC and OKP conversion in both directions
//! - **Key store**: an insertion-ordered collection with JSON persistence
//!
//! ## Quick Start
//!
//! ```rust
//! use jwtsmith_key::{Bits, JwsAlgorithm, Key, SymmetricKey};
//!
//! # fn main() -> jwtsmith_key::Result<()> {
//! let key = Key::Symmetric(SymmetricKey::generate(256u32.bits(), Some("hmac".into()))?);
//!
//! assert!(key.can_sign());
//! assert!(key.signing_algorithms().contains(&JwsAlgorithm::Hs256));
//! assert_eq!(key.description(), "OCT 256");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithms;
pub mod bits_macro;
pub mod curves;
pub mod error;
pub mod jwk;
pub mod jwk_set;
pub mod key_id;
pub mod key_store;
pub mod keys;
pub mod pem;

pub use algorithms::{EncryptionMethod, JweAlgorithm, JwsAlgorithm};
pub use bits_macro::{BitSize, Bits};
pub use curves::{EcCurve, OkpCurve};
pub use error::{KeyError, PemStage, Result};
pub use jwk_set::import_jwk_set;
pub use key_store::KeyStore;
pub use keys::{EcKey, Key, OkpKey, PasswordKey, RsaKey, SymmetricKey};
pub use crate::pem::{key_to_pem, pem_to_ec_key, pem_to_key, pem_to_okp_key, pem_to_rsa_key};

/// Curve crates reachable from [`with_ec_curve!`] expansions
#[doc(hidden)]
pub mod __private {
    pub use k256;
    pub use p256;
    pub use p384;
    pub use p521;
}

/// Run an expression with an alias bound to the RustCrypto crate for a curve
///
/// ```
/// use jwtsmith_key::{with_ec_curve, EcCurve};
///
/// let len = with_ec_curve!(EcCurve::P384, c => c::FieldBytes::default().len());
/// assert_eq!(len, 48);
/// ```
#[macro_export]
macro_rules! with_ec_curve {
    ($curve:expr, $c:ident => $body:expr) => {
        match $curve {
            $crate::EcCurve::P256 => {
                use $crate::__private::p256 as $c;
                $body
            }
            $crate::EcCurve::Secp256k1 => {
                use $crate::__private::k256 as $c;
                $body
            }
            $crate::EcCurve::P384 => {
                use $crate::__private::p384 as $c;
                $body
            }
            $crate::EcCurve::P521 => {
                use $crate::__private::p521 as $c;
                $body
            }
        }
    };
}
