//! `moka` backend

use cachebench::{Cache, StatValue, Stats};

use crate::stats::CacheStats;

/// `moka::sync::Cache` weighted by key and value length
pub struct MokaCache {
    cache: moka::sync::Cache<Vec<u8>, Vec<u8>>,
    stats: CacheStats,
}

impl MokaCache {
    /// Create a cache holding roughly `capacity` bytes of keys and values
    pub fn new(capacity: usize) -> Self {
        let cache = moka::sync::Cache::builder()
            .weigher(|k: &Vec<u8>, v: &Vec<u8>| {
                u32::try_from(k.len() + v.len()).unwrap_or(u32::MAX)
            })
            .max_capacity(capacity as u64)
            .build();
        Self {
            cache,
            stats: CacheStats::new(),
        }
    }
}

impl Cache for MokaCache {
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
        // Entry count and weight are only settled once pending
        // maintenance has been applied
        self.cache.run_pending_tasks();

        let mut stats = self.stats.export();
        stats.insert("count".into(), StatValue::from(self.cache.entry_count()));
        stats.insert(
            "weightedSize".into(),
            StatValue::from(self.cache.weighted_size()),
        );
        stats
    }
}
