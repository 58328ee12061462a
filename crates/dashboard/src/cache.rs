use lru::LruCache;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;

/// A bounded memo of pure computations, keyed by a hash of their inputs.
///
/// Entries are advisory: evicting one, or failing to hash an input, only
/// means the value is computed again.
pub struct Memo<V> {
    entries: LruCache<String, V>,
    hits: u64,
    misses: u64,
}

/// Hex SHA-256 of the JSON encoding of `inputs`.
pub fn content_key<K: Serialize + ?Sized>(inputs: &K) -> Option<String> {
    let bytes = serde_json::to_vec(inputs).ok()?;
    Some(hex::encode(Sha256::digest(&bytes)))
}

impl<V: Clone> Memo<V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_compute<K, F>(&mut self, inputs: &K, compute: F) -> V
    where
        K: Serialize + ?Sized,
        F: FnOnce() -> V,
    {
        let Some(key) = content_key(inputs) else {
            tracing::debug!("Memo key could not be derived; computing directly.");
            self.misses += 1;
            return compute();
        };
        if let Some(value) = self.entries.get(&key) {
            self.hits += 1;
            return value.clone();
        }
        self.misses += 1;
        let value = compute();
        self.entries.put(key, value.clone());
        value
    }

    /// Like [`get_or_compute`](Self::get_or_compute), caching only successes.
    pub fn get_or_try_compute<K, E, F>(&mut self, inputs: &K, compute: F) -> Result<V, E>
    where
        K: Serialize + ?Sized,
        F: FnOnce() -> Result<V, E>,
    {
        let key = content_key(inputs);
        if let Some(value) = key.as_ref().and_then(|k| self.entries.get(k)) {
            self.hits += 1;
            return Ok(value.clone());
        }
        self.misses += 1;
        let value = compute()?;
        if let Some(key) = key {
            self.entries.put(key, value.clone());
        }
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
