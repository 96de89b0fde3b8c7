//! Bidirectional id table.
//!
//! ```text
//!   forward:  key ─────────► (native_id, value)
//!   reverse:  native_id ───► key
//! ```
//!
//! Both directions are only ever written together, so a key resolves to
//! exactly one native object and every native id maps back to the key that
//! owns it.

use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry<V> {
    native_id: String,
    value: V,
}

#[derive(Debug, Clone)]
pub struct IdMap<V> {
    forward: HashMap<String, Entry<V>>,
    reverse: HashMap<String, String>,
}

impl<V> Default for IdMap<V> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }
}

impl<V> IdMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`. Returns the entry that previously owned
    /// `key` (its native id and value) so the caller can release it.
    pub fn insert(&mut self, key: String, native_id: String, value: V) -> Option<(String, V)> {
        let previous = self.remove(&key);
        // A native id can only belong to one key
        if let Some(stale_key) = self.reverse.remove(&native_id) {
            self.forward.remove(&stale_key);
        }
        self.reverse.insert(native_id.clone(), key.clone());
        self.forward.insert(key, Entry { native_id, value });
        previous
    }

    /// Remove `key`, returning its native id and value.
    pub fn remove(&mut self, key: &str) -> Option<(String, V)> {
        let entry = self.forward.remove(key)?;
        self.reverse.remove(&entry.native_id);
        Some((entry.native_id, entry.value))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.forward.get(key).map(|e| &e.value)
    }

    pub fn native_id(&self, key: &str) -> Option<&str> {
        self.forward.get(key).map(|e| e.native_id.as_str())
    }

    /// Registry key owning `native_id`
    pub fn key_for_native(&self, native_id: &str) -> Option<&str> {
        self.reverse.get(native_id).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.forward.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }

    /// Empty both directions, returning the native ids that were held.
    pub fn clear(&mut self) -> Vec<String> {
        self.reverse.clear();
        self.forward.drain().map(|(_, e)| e.native_id).collect()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.forward.len() == self.reverse.len()
            && self
                .forward
                .iter()
                .all(|(key, e)| self.reverse.get(&e.native_id) == Some(key))
    }
}
