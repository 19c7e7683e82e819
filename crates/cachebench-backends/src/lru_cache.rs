//! `lru` backend: byte-bounded LRU map behind a lock

use std::sync::atomic::{AtomicU64, Ordering};

use cachebench::{Cache, StatValue, Stats};
use parking_lot::RwLock;

use crate::lru::{LruMap, Put};
use crate::stats::CacheStats;

/// LRU cache bounded by the bytes of its keys and values
pub struct LruCache {
    /// Entries in recency order
    map: RwLock<LruMap>,

    /// Lookup and store counters
    stats: CacheStats,

    evictions: AtomicU64,
    overwrites: AtomicU64,
    rejected: AtomicU64,
}

impl LruCache {
    /// Create an LRU cache holding up to `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            map: RwLock::new(LruMap::new(capacity)),
            stats: CacheStats::new(),
            evictions: AtomicU64::new(0),
            overwrites: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Get current number of entries
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Cache for LruCache {
    fn set(&self, key: &[u8], value: &[u8]) {
        let outcome = self.map.write().put(key, value);
        self.stats.record_set();
        match outcome {
            Put::Inserted { evicted } => {
                self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
            }
            Put::Replaced { evicted } => {
                self.overwrites.fetch_add(1, Ordering::Relaxed);
                self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
            }
            Put::Rejected => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        // Lookups reorder the list, so they take the write lock
        let value = self.map.write().get(key).map(<[u8]>::to_vec);
        self.stats.record_get(value.is_some());
        value
    }

    fn stat(&self) -> Stats {
        let mut stats = self.stats.export();
        let map = self.map.read();
        stats.insert("count".into(), StatValue::from(map.len()));
        stats.insert("bytes".into(), StatValue::from(map.used_bytes()));
        stats.insert("capacity".into(), StatValue::from(map.capacity()));
        stats.insert(
            "evictions".into(),
            StatValue::from(self.evictions.load(Ordering::Relaxed)),
        );
        stats.insert(
            "overWrite".into(),
            StatValue::from(self.overwrites.load(Ordering::Relaxed)),
        );
        stats.insert(
            "rejected".into(),
            StatValue::from(self.rejected.load(Ordering::Relaxed)),
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basic() {
        let cache = LruCache::new(1024);

        cache.set(b"key", b"value");
        assert_eq!(cache.get(b"key"), Some(b"value".to_vec()));
        assert_eq!(cache.get(b"nope"), None);
        assert_eq!(cache.len(), 1);

        let stats = cache.stat();
        assert_eq!(stats["hits"], StatValue::Unsigned(1));
        assert_eq!(stats["misses"], StatValue::Unsigned(1));
        assert_eq!(stats["count"], StatValue::Unsigned(1));
        assert_eq!(stats["bytes"], StatValue::Unsigned(8));
        assert_eq!(stats["capacity"], StatValue::Unsigned(1024));
        assert_eq!(stats["hitRate"], StatValue::Float(0.5));
    }

    #[test]
    fn test_cache_eviction_counted() {
        let cache = LruCache::new(8);

        cache.set(b"k1", b"aa");
        cache.set(b"k2", b"bb");
        cache.set(b"k3", b"cc");

        assert_eq!(cache.get(b"k1"), None);
        assert_eq!(cache.stat()["evictions"], StatValue::Unsigned(1));
    }

    #[test]
    fn test_cache_overwrite_and_reject() {
        let cache = LruCache::new(8);

        cache.set(b"k1", b"aa");
        cache.set(b"k1", b"bb");
        cache.set(b"big-key", b"big-value");

        let stats = cache.stat();
        assert_eq!(stats["overWrite"], StatValue::Unsigned(1));
        assert_eq!(stats["rejected"], StatValue::Unsigned(1));
        assert_eq!(stats["sets"], StatValue::Unsigned(3));
        assert_eq!(cache.get(b"k1"), Some(b"bb".to_vec()));
    }
}
