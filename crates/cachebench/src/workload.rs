//! Workload policies
//!
//! A [`Workload`] performs exactly one cache operation per call and tells the
//! driver whether it read or wrote. The driver advances its write cursor only
//! after a write.

use std::fmt;
use std::hint::black_box;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cache::Cache;
use crate::error::{Error, Result};

/// Kind of operation performed by a workload step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Lookup of a sampled key
    Read,
    /// Store of the current key/value pair
    Write,
}

/// Strategy deciding what each benchmark iteration does.
pub trait Workload {
    /// Perform one operation against `cache`.
    ///
    /// `count` is the number of operations completed so far. `key` and
    /// `value` are the current write cursor; `query` holds a key sampled
    /// below `key`, refreshed by the driver after every iteration.
    fn step(
        &mut self,
        count: u64,
        cache: &dyn Cache,
        key: &[u8],
        value: &[u8],
        query: &[u8],
    ) -> Op;

    /// Whether the cache should be preloaded before the timed run
    fn needs_preload(&self) -> bool {
        false
    }
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    fn step(
        &mut self,
        count: u64,
        cache: &dyn Cache,
        key: &[u8],
        value: &[u8],
        query: &[u8],
    ) -> Op {
        (**self).step(count, cache, key, value, query)
    }

    fn needs_preload(&self) -> bool {
        (**self).needs_preload()
    }
}

/// Always writes the current pair
#[derive(Debug, Clone, Copy, Default)]
pub struct PureSet;

impl Workload for PureSet {
    fn step(
        &mut self,
        _count: u64,
        cache: &dyn Cache,
        key: &[u8],
        value: &[u8],
        _query: &[u8],
    ) -> Op {
        cache.set(key, value);
        Op::Write
    }
}

/// Always reads a sampled key
#[derive(Debug, Clone, Copy, Default)]
pub struct PureGet;

impl Workload for PureGet {
    fn step(
        &mut self,
        _count: u64,
        cache: &dyn Cache,
        _key: &[u8],
        _value: &[u8],
        query: &[u8],
    ) -> Op {
        black_box(cache.get(query));
        Op::Read
    }

    fn needs_preload(&self) -> bool {
        true
    }
}

/// Reads with probability `get_percent`%, writes otherwise
#[derive(Debug, Clone)]
pub struct Mixed {
    get_percent: u8,
    rng: SmallRng,
}

impl Mixed {
    /// Create a mixed policy seeded from the OS.
    ///
    /// # Panics
    /// If `get_percent` is above 100.
    pub fn new(get_percent: u8) -> Self {
        Self::with_rng(get_percent, SmallRng::from_entropy())
    }

    /// Create a mixed policy with a reproducible decision stream
    pub fn with_seed(get_percent: u8, seed: u64) -> Self {
        Self::with_rng(get_percent, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(get_percent: u8, rng: SmallRng) -> Self {
        assert!(get_percent <= 100, "get percentage must be within 0..=100");
        Self { get_percent, rng }
    }

    /// Probability of a read, in percent
    pub fn get_percent(&self) -> u8 {
        self.get_percent
    }
}

impl Workload for Mixed {
    fn step(
        &mut self,
        _count: u64,
        cache: &dyn Cache,
        key: &[u8],
        value: &[u8],
        query: &[u8],
    ) -> Op {
        if self.rng.gen_range(0..100u8) < self.get_percent {
            black_box(cache.get(query));
            Op::Read
        } else {
            cache.set(key, value);
            Op::Write
        }
    }
}

/// Workload selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// [`PureGet`]
    Get,
    /// [`PureSet`]
    Set,
    /// [`Mixed`] with the given read percentage
    GetSet(u8),
}

impl Mode {
    /// Parse a mode name, case-insensitively.
    ///
    /// `get_percent` only applies to `getset` and must be within `0..=100`.
    pub fn parse(name: &str, get_percent: u8) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "get" => Ok(Mode::Get),
            "set" => Ok(Mode::Set),
            "getset" if get_percent <= 100 => Ok(Mode::GetSet(get_percent)),
            "getset" => Err(Error::InvalidConfig(format!(
                "get percentage {} is above 100",
                get_percent
            ))),
            other => Err(Error::InvalidConfig(format!("unknown mode {:?}", other))),
        }
    }

    /// Build the policy for this mode.
    ///
    /// `seed` is the run seed shared with the key sampler; the mixed policy
    /// draws from a stream derived from it, never the sampler's own.
    pub fn workload(self, seed: Option<u64>) -> Box<dyn Workload> {
        match self {
            Mode::Get => Box::new(PureGet),
            Mode::Set => Box::new(PureSet),
            Mode::GetSet(p) => match seed {
                Some(seed) => Box::new(Mixed::with_seed(p, policy_seed(seed))),
                None => Box::new(Mixed::new(p)),
            },
        }
    }
}

/// Seed of the mixed policy's stream for a given run seed
fn policy_seed(seed: u64) -> u64 {
    seed.wrapping_add(0x9E37_79B9_7F4A_7C15)
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Get => f.write_str("get"),
            Mode::Set => f.write_str("set"),
            Mode::GetSet(p) => write!(f, "getset({}% get)", p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::mock::CountingCache;

    fn run(workload: &mut dyn Workload, cache: &CountingCache, n: u64) -> (u64, u64) {
        let (mut reads, mut writes) = (0, 0);
        for i in 0..n {
            match workload.step(i, cache, b"key", b"value", b"qry") {
                Op::Read => reads += 1,
                Op::Write => writes += 1,
            }
        }
        (reads, writes)
    }

    #[test]
    fn test_pure_set() {
        let cache = CountingCache::new();
        let (reads, writes) = run(&mut PureSet, &cache, 10);

        assert_eq!((reads, writes), (0, 10));
        assert_eq!(cache.sets(), 10);
        assert_eq!(cache.gets(), 0);
        assert_eq!(cache.get(b"key"), Some(b"value".to_vec()));
    }

    #[test]
    fn test_pure_get_reads_query() {
        let cache = CountingCache::new();
        let (reads, writes) = run(&mut PureGet, &cache, 10);

        assert_eq!((reads, writes), (10, 0));
        assert_eq!(cache.sets(), 0);
        assert_eq!(cache.gets(), 10);
        assert!(PureGet.needs_preload());
    }

    #[test]
    fn test_mixed_extremes() {
        let cache = CountingCache::new();
        assert_eq!(run(&mut Mixed::with_seed(100, 1), &cache, 1_000), (1_000, 0));

        let cache = CountingCache::new();
        assert_eq!(run(&mut Mixed::with_seed(0, 1), &cache, 1_000), (0, 1_000));
    }

    #[test]
    fn test_mixed_ratio() {
        let cache = CountingCache::new();
        let (reads, writes) = run(&mut Mixed::with_seed(30, 42), &cache, 10_000);

        assert_eq!(reads + writes, 10_000);
        assert!((2_500..3_500).contains(&reads), "reads = {}", reads);
        assert_eq!(cache.gets(), reads);
        assert_eq!(cache.sets(), writes);
    }

    #[test]
    #[should_panic]
    fn test_mixed_rejects_percent_over_100() {
        Mixed::with_seed(101, 0);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("get", 50).unwrap(), Mode::Get);
        assert_eq!(Mode::parse("SET", 50).unwrap(), Mode::Set);
        assert_eq!(Mode::parse("getset", 75).unwrap(), Mode::GetSet(75));
        assert!(matches!(Mode::parse("getset", 101), Err(Error::InvalidConfig(_))));
        assert!(matches!(Mode::parse("scan", 0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_mode_workload() {
        assert!(Mode::Get.workload(None).needs_preload());
        assert!(!Mode::Set.workload(None).needs_preload());

        let cache = CountingCache::new();
        let mut workload = Mode::GetSet(100).workload(Some(1));
        assert_eq!(run(&mut workload, &cache, 5), (5, 0));
    }

    #[test]
    fn test_mode_seed_differs_from_sampler_seed() {
        fn ops(workload: &mut dyn Workload) -> Vec<Op> {
            let cache = CountingCache::counting_only();
            (0..64)
                .map(|i| workload.step(i, &cache, b"key", b"value", b"qry"))
                .collect()
        }

        let seed = 7;
        assert_ne!(policy_seed(seed), seed);
        let mut derived = Mode::GetSet(50).workload(Some(seed));
        let mut shared = Mixed::with_seed(50, seed);
        assert_ne!(ops(&mut derived), ops(&mut shared));
        assert_eq!(
            ops(&mut Mode::GetSet(50).workload(Some(seed))),
            ops(&mut Mixed::with_seed(50, policy_seed(seed)))
        );
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Get.to_string(), "get");
        assert_eq!(Mode::GetSet(50).to_string(), "getset(50% get)");
    }
}
