//! Benchmark configuration

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::workload::Workload;

/// Default key width in bytes
pub const DEFAULT_KEY_SIZE: usize = 32;

/// Default value width in bytes
pub const DEFAULT_VALUE_SIZE: usize = 100;

/// Default cache capacity (1 GiB)
pub const DEFAULT_CACHE_SIZE: usize = 1024 * 1024 * 1024;

/// Default run length
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Settings of a single benchmark run.
///
/// Validated on construction and consumed by [`crate::run`]; there is no way
/// to change a config once built.
pub struct BenchConfig {
    key_size: usize,
    value_size: usize,
    cache_size: usize,
    duration: Duration,
    seed: Option<u64>,
    workload: Box<dyn Workload>,
}

impl BenchConfig {
    /// Build a config, rejecting values that cannot describe a run.
    ///
    /// # Arguments
    /// * `key_size` - Width of every key in bytes
    /// * `value_size` - Width of every value in bytes
    /// * `cache_size` - Capacity handed to the cache, in bytes
    /// * `duration` - Wall-clock length of the timed loop
    /// * `workload` - Policy run on every iteration
    pub fn new(
        key_size: usize,
        value_size: usize,
        cache_size: usize,
        duration: Duration,
        workload: Box<dyn Workload>,
    ) -> Result<Self> {
        if key_size == 0 {
            return Err(Error::InvalidConfig("key size must be non-zero".into()));
        }
        if value_size == 0 {
            return Err(Error::InvalidConfig("value size must be non-zero".into()));
        }
        if cache_size == 0 {
            return Err(Error::InvalidConfig("cache size must be non-zero".into()));
        }
        if duration.is_zero() {
            return Err(Error::InvalidConfig("duration must be non-zero".into()));
        }
        match key_size.checked_add(value_size) {
            Some(entry) if entry <= cache_size => {}
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "entry of {} + {} bytes does not fit a {} byte cache",
                    key_size, value_size, cache_size
                )))
            }
        }

        Ok(Self {
            key_size,
            value_size,
            cache_size,
            duration,
            seed: None,
            workload,
        })
    }

    /// Seed the key sampler for a reproducible lookup stream
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Key width in bytes
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    /// Value width in bytes
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Cache capacity in bytes
    pub fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// Length of the timed loop
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Sampler seed, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of pairs that fill the cache capacity
    pub fn preload_entries(&self) -> usize {
        self.cache_size / (self.key_size + self.value_size)
    }

    /// Whether the workload wants a populated cache before timing starts
    pub fn needs_preload(&self) -> bool {
        self.workload.needs_preload()
    }

    pub(crate) fn workload_mut(&mut self) -> &mut dyn Workload {
        self.workload.as_mut()
    }
}

impl fmt::Debug for BenchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchConfig")
            .field("key_size", &self.key_size)
            .field("value_size", &self.value_size)
            .field("cache_size", &self.cache_size)
            .field("duration", &self.duration)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
