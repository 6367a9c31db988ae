//! Gram cache implementation
//!
//! Provides an LRU cache for pairwise kernel values between training examples,
//! so that the kernel perceptron does not recompute k(x_i, x_j) on every epoch.
//! Kernel matrices are symmetric, so we only cache k(i,j) where i <= j.

use crate::utils::memory::BYTES_PER_ENTRY;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for kernel values, normalized so that i <= j
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    /// Create a normalized cache key where i <= j
    fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { i, j }
        } else {
            Self { i: j, j: i }
        }
    }
}

/// LRU cache for Gram matrix entries
pub struct GramCache {
    cache: LruCache<CacheKey, f64>,
    hits: u64,
    misses: u64,
}

impl GramCache {
    /// Create a new cache holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache sized from a memory budget in bytes
    ///
    /// Returns `None` for a zero budget, meaning "do not cache".
    pub fn with_memory_limit(memory_bytes: usize) -> Option<Self> {
        if memory_bytes == 0 {
            return None;
        }
        Some(Self::new((memory_bytes / BYTES_PER_ENTRY).max(1)))
    }

    /// Get a kernel value from cache
    pub fn get(&mut self, i: usize, j: usize) -> Option<f64> {
        let key = CacheKey::new(i, j);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            Some(value)
        } else {
            self.misses += 1;
            None
        }
    }

    /// Put a kernel value into cache
    pub fn put(&mut self, i: usize, j: usize, value: f64) {
        self.cache.put(CacheKey::new(i, j), value);
    }

    /// Return the cached value for (i, j), computing and storing it on a miss
    pub fn get_or_insert_with<F>(&mut self, i: usize, j: usize, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        match self.get(i, j) {
            Some(value) => value,
            None => {
                let value = compute();
                self.put(i, j, value);
                value
            }
        }
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.cache.cap().get(),
            size: self.cache.len(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub capacity: usize,
    pub size: usize,
}
