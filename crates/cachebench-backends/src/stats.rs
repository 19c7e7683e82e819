//! Hit/miss accounting shared by all adapters

use std::sync::atomic::{AtomicU64, Ordering};

use cachebench::{StatValue, Stats};

/// Lookup and store counters kept by an adapter
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

impl CacheStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a lookup
    pub fn record_get(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a store
    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get total misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get total stores
    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
    }

    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Start a report map with the shared counters
    pub fn export(&self) -> Stats {
        let mut stats = Stats::new();
        stats.insert("hits".into(), StatValue::from(self.hits()));
        stats.insert("misses".into(), StatValue::from(self.misses()));
        stats.insert("sets".into(), StatValue::from(self.sets()));
        stats.insert("hitRate".into(), StatValue::from(self.hit_ratio()));
        stats
    }
}
