//! Preload and timed benchmark loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::BenchConfig;
use crate::memstat::MemStats;
use crate::report::Report;
use crate::sequence::{sample, Sequence};
use crate::workload::Op;

/// Stop condition polled once per loop iteration
pub trait Deadline {
    /// Whether the run should stop now
    fn expired(&self) -> bool;
}

/// One-shot flag raised by a timer thread after a fixed duration
#[derive(Debug, Clone)]
pub struct Timer {
    stop: Arc<AtomicBool>,
}

impl Timer {
    /// Arm a timer that fires once `duration` has elapsed.
    ///
    /// The timer thread is detached; dropping the `Timer` does not cancel it.
    pub fn start(duration: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        thread::spawn(move || {
            thread::sleep(duration);
            flag.store(true, Ordering::Release);
        });
        Self { stop }
    }
}

impl Deadline for Timer {
    fn expired(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Fill `cache` up to its configured capacity.
///
/// Writes `cache_size / (key_size + value_size)` pairs starting from the
/// zero key and returns the key the sequence stopped at, so that a following
/// read-only [`run`] samples inside the populated range.
pub fn preload(cache: &dyn Cache, config: &BenchConfig) -> Vec<u8> {
    let entries = config.preload_entries();
    let mut seq = Sequence::new(config.key_size(), config.value_size());
    for _ in 0..entries {
        cache.set(seq.key(), seq.value());
        seq.advance();
    }
    info!(entries, "cache preloaded");
    seq.into_key()
}

/// Run the configured workload against `cache` for the configured duration.
///
/// `start_key` resumes the write cursor, typically from [`preload`].
pub fn run(cache: &dyn Cache, config: BenchConfig, start_key: Option<&[u8]>) -> Report {
    let timer = Timer::start(config.duration());
    run_until(cache, config, start_key, &timer)
}

/// Same as [`run`], stopping when `deadline` expires.
///
/// Throughput is still computed against the configured duration.
pub fn run_until<D: Deadline + ?Sized>(
    cache: &dyn Cache,
    mut config: BenchConfig,
    start_key: Option<&[u8]>,
    deadline: &D,
) -> Report {
    let (key_size, value_size) = (config.key_size(), config.value_size());
    let mut seq = match start_key {
        Some(key) => Sequence::resume(key_size, value_size, key),
        None => Sequence::new(key_size, value_size),
    };
    let mut query = vec![0u8; key_size];
    let mut rng = match config.seed() {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    sample(&mut query, seq.key(), &mut rng);

    info!(
        key_size,
        value_size,
        duration = ?config.duration(),
        "starting benchmark"
    );
    debug!(?config, "benchmark config");

    let mut count: u64 = 0;
    let workload = config.workload_mut();
    while !deadline.expired() {
        if workload.step(count, cache, seq.key(), seq.value(), &query) == Op::Write {
            seq.advance();
        }
        count += 1;
        sample(&mut query, seq.key(), &mut rng);
    }

    let mem_stat = MemStats::snapshot();
    let report = Report::new(count, config.duration(), mem_stat, cache.stat());
    info!(ops = count, tps = report.tps, "benchmark finished");
    report
}
