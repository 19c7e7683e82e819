//! Benchmark report

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::cache::Stats;
use crate::memstat::{to_megabytes, MemStats};

/// Result of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Operations per second over the configured duration
    pub tps: u64,
    /// Operations completed
    pub ops: u64,
    /// Heap counters taken when the loop stopped
    pub mem_stat: MemStats,
    /// Statistics reported by the cache itself
    pub cache_stat: Stats,
}

impl Report {
    /// Combine the loop outcome with the memory and cache snapshots
    pub fn new(ops: u64, duration: Duration, mem_stat: MemStats, cache_stat: Stats) -> Self {
        Self {
            tps: throughput(ops, duration),
            ops,
            mem_stat,
            cache_stat,
        }
    }
}

/// Whole operations per second, truncated and saturating at `u64::MAX`.
///
/// Equals `ops / secs` for whole-second durations; fractional durations are
/// measured in nanoseconds rather than rounded down to whole seconds.
pub fn throughput(ops: u64, duration: Duration) -> u64 {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return 0;
    }
    u64::try_from(u128::from(ops) * 1_000_000_000 / nanos).unwrap_or(u64::MAX)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "**************** Benchmark Report ****************")?;
        writeln!(f, "[1] TPS {}", self.tps)?;
        writeln!(
            f,
            "[2] MemStat Alloc: {}MB, TotalAlloc:{}MB, Sys:{}MB, Mallocs:{}, Free:{}",
            to_megabytes(self.mem_stat.alloc),
            to_megabytes(self.mem_stat.total_alloc),
            to_megabytes(self.mem_stat.sys),
            self.mem_stat.mallocs,
            self.mem_stat.frees,
        )?;
        write!(f, "[3] CacheStat map[")?;
        for (i, (name, value)) in self.cache_stat.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", name, value)?;
        }
        writeln!(f, "]")
    }
}
