//! `quick` backend

use cachebench::{Cache, StatValue, Stats};
use quick_cache::Weighter;

use crate::stats::CacheStats;

/// Weighs an entry by the bytes of its key and value
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteWeighter;

impl Weighter<Vec<u8>, Vec<u8>> for ByteWeighter {
    fn weight(&self, key: &Vec<u8>, val: &Vec<u8>) -> u64 {
        (key.len() + val.len()) as u64
    }
}

/// `quick_cache::sync::Cache` weighted by key and value length
pub struct QuickCache {
    cache: quick_cache::sync::Cache<Vec<u8>, Vec<u8>, ByteWeighter>,
    stats: CacheStats,
}

impl QuickCache {
    /// Create a cache holding up to `capacity` bytes of keys and values.
    ///
    /// `value_size` only sizes the initial entry estimate.
    pub fn new(capacity: usize, value_size: usize) -> Self {
        let estimated_items = (capacity / value_size.max(1)).max(1);
        Self {
            cache: quick_cache::sync::Cache::with_weighter(
                estimated_items,
                capacity as u64,
                ByteWeighter,
            ),
            stats: CacheStats::new(),
        }
    }

    /// Bytes of keys and values currently held
    pub fn weight(&self) -> u64 {
        self.cache.weight()
    }

    /// Byte capacity
    pub fn capacity(&self) -> u64 {
        self.cache.capacity()
    }
}

impl Cache for QuickCache {
    fn set(&self, key: &[u8], value: &[u8]) {
        self.cache.insert(key.to_vec(), value.to_vec());
        self.stats.record_set();
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let value = self.cache.get(key);
        self.stats.record_get(value.is_some());
        value
    }

    fn stat(&self) -> Stats {
        let mut stats = self.stats.export();
        stats.insert("count".into(), StatValue::from(self.cache.len()));
        stats.insert("weight".into(), StatValue::from(self.weight()));
        stats.insert("capacity".into(), StatValue::from(self.capacity()));
        stats
    }
}
