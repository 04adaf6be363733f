//! Insertion-ordered key collection with JSON persistence
//!
//! Keys are unique by key id. Keys added without an id receive a random one
//! so every stored key can be addressed.

use serde_json::Value;
use tracing::debug;

use crate::error::{KeyError, Result};
use crate::key_id;
use crate::keys::Key;

/// Ordered set of keys addressed by key id
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    keys: Vec<Key>,
}

impl KeyStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, replacing in place any key with the same id
    ///
    /// Returns the id the key is stored under.
    pub fn add(&mut self, key: Key) -> String {
        let key = match key.key_id() {
            Some(_) => key,
            None => key.with_key_id(key_id::random()),
        };
        let kid = key.key_id().unwrap_or_default().to_owned();

        match self.position(&kid) {
            Some(index) => self.keys[index] = key,
            None => self.keys.push(key),
        }
        kid
    }

    /// Key with the given id
    #[must_use]
    pub fn get(&self, kid: &str) -> Option<&Key> {
        self.position(kid).map(|index| &self.keys[index])
    }

    /// Whether a key with the given id is stored
    #[must_use]
    pub fn contains(&self, kid: &str) -> bool {
        self.position(kid).is_some()
    }

    /// Remove the key with the given id
    pub fn delete(&mut self, kid: &str) -> Option<Key> {
        self.position(kid).map(|index| self.keys.remove(index))
    }

    /// Remove keys by position
    ///
    /// Indices refer to positions before any removal; duplicates and indices
    /// out of range are ignored.
    pub fn delete_indices(&mut self, indices: &[usize]) {
        let mut index = 0;
        self.keys.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Keys able to sign
    pub fn signing_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|key| key.can_sign())
    }

    /// Keys able to verify
    pub fn verification_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|key| key.can_verify())
    }

    /// Keys able to encrypt
    pub fn encryption_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|key| key.can_encrypt())
    }

    /// Keys able to decrypt
    pub fn decryption_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|key| key.can_decrypt())
    }

    /// Compact JSON array of every key's persistence form
    pub fn serialize(&self) -> Result<String> {
        let entries = self
            .keys
            .iter()
            .map(Key::to_json_object)
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_string(&entries)?)
    }

    /// Restore a store written by [`KeyStore::serialize`]
    ///
    /// Entries that cannot be parsed are skipped.
    pub fn parse(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        let entries = document
            .as_array()
            .ok_or_else(|| KeyError::json("key store must be a JSON array"))?;

        let mut store = Self::new();
        for (index, entry) in entries.iter().enumerate() {
            match Key::from_json_object(entry) {
                Ok(key) => {
                    store.add(key);
                }
                Err(error) => debug!(index, %error, "Skipping stored key"),
            }
        }
        Ok(store)
    }

    fn position(&self, kid: &str) -> Option<usize> {
        self.keys.iter().position(|key| key.key_id() == Some(kid))
    }
}

impl FromIterator<Key> for KeyStore {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut store = Self::new();
        for key in iter {
            store.add(key);
        }
        store
    }
}

impl<'a> IntoIterator for &'a KeyStore {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
