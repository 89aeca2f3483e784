//! Time-bounded keyed cache with lazy expiry.
//!
//! Used as the parse-result cache and as a general memoization store shared by
//! every plugin through the execution context. Expired entries are never swept
//! in the background; they are treated as absent and evicted the next time the
//! key is touched.

use std::{
    any::Any,
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use serde::Serialize;

/// Type-erased value stored in the [`SharedCache`].
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// The cache instance carried by the execution context.
pub type SharedCache = KeyedCache<CacheValue>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

pub struct KeyedCache<V> {
    state: Mutex<CacheState<V>>,
    default_ttl: Option<Duration>,
}

impl<V: Clone> KeyedCache<V> {
    /// Create a cache whose entries live for `default_ttl` (`None` = forever).
    pub fn new(default_ttl: Option<Duration>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.state.lock();
        match state.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = entry.value.clone();
                state.hits += 1;
                Some(value)
            }
            Some(_) => {
                state.entries.remove(key);
                state.evictions += 1;
                state.misses += 1;
                None
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.state
            .lock()
            .entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Check for a live entry. Does not count towards hit/miss statistics.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.state.lock();
        match state.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                state.entries.remove(key);
                state.evictions += 1;
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Remove an entry. Returns true if a live entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        self.state
            .lock()
            .entries
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs without the lock held, so two callers racing on the same
    /// key may both compute; the first stored value wins.
    pub fn get_or_insert_with(&self, key: &str, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        let now = Instant::now();
        let mut state = self.state.lock();
        if let Some(existing) = state.entries.get(key)
            && !existing.is_expired(now)
        {
            return existing.value.clone();
        }
        let expires_at = self.default_ttl.map(|ttl| now + ttl);
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                expires_at,
            },
        );
        value
    }
}

impl<V: Clone> Default for KeyedCache<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl KeyedCache<CacheValue> {
    /// Typed lookup. A value stored under `key` with a different type is
    /// reported as absent.
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(|value| value.downcast::<T>().ok())
    }

    pub fn set_value<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        self.set(key, value);
    }

    /// Typed memoization on top of [`KeyedCache::get_or_insert_with`].
    pub fn memoize<T: Any + Send + Sync>(
        &self,
        key: &str,
        compute: impl FnOnce() -> T,
    ) -> Option<Arc<T>> {
        let value = self.get_or_insert_with(key, || Arc::new(compute()) as CacheValue);
        value.downcast::<T>().ok()
    }
}
