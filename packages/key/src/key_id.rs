//! Key identifier helpers

use uuid::Uuid;

/// Generate a random key identifier (UUID v4)
#[must_use]
pub fn random() -> String {
    Uuid::new_v4().to_string()
}
