//! JWK Set import (RFC 7517 §5)

use serde_json::Value;
use tracing::debug;

use crate::error::{KeyError, Result};
use crate::keys::Key;

/// Import every usable key of a JWK Set document
///
/// Invalid JSON or a document without a `keys` array fails the whole call.
/// Entries that are unsupported or malformed are skipped.
pub fn import_jwk_set(json: &str) -> Result<Vec<Key>> {
    let document: Value = serde_json::from_str(json)?;
    let entries = document
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| KeyError::json("JWK Set must contain a 'keys' array"))?;

    let keys: Vec<Key> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match Key::from_jwk(entry) {
            Ok(key) => Some(key),
            Err(error) => {
                debug!(index, %error, "Skipping JWK Set entry");
                None
            }
        })
        .collect();

    debug!(imported = keys.len(), total = entries.len(), "Imported JWK Set");
    Ok(keys)
}
