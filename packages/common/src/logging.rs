//! Structured logging bootstrap
//!
//! Library code logs through `tracing`, whose `log` feature forwards records
//! to whichever `log` logger is installed. Tests install `env_logger`
//! through this module, and secrets are logged only as fingerprints.

use sha2::{Digest, Sha256};

/// Logging infrastructure using `env_logger`
///
/// Levels come from the `RUST_LOG` environment variable, for example
/// `RUST_LOG=jwtsmith_jose=debug,jwtsmith_key=warn`.
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; only the first call installs the logger.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Short SHA-256 fingerprint of sensitive bytes for log correlation
    ///
    /// Returns `#` followed by the first 12 hex characters of the digest.
    pub fn fingerprint(bytes: impl AsRef<[u8]>) -> String {
        let hash = Sha256::digest(bytes.as_ref());
        let hex_hash = ::hex::encode(hash);
        format!("#{}", &hex_hash[..12])
    }
}
