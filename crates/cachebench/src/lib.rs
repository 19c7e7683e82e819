//! # cachebench
//!
//! Timed get/set benchmark driver for in-memory key/value caches.
//!
//! ## Architecture
//! - **Sequence**: fixed-width little-endian counters for keys and values
//! - **Workload**: per-iteration policy (pure get, pure set, mixed)
//! - **Driver**: preload phase plus a deadline-bounded loop
//! - **Report**: throughput, heap counters and backend statistics
//!
//! Caches plug in through the [`Cache`] trait; see `cachebench-backends`
//! for the bundled adapters.

#![warn(missing_docs)]

mod cache;
mod config;
mod driver;
mod error;
mod memstat;
mod report;
pub mod sequence;
pub mod workload;

pub use cache::{Cache, StatValue, Stats};
pub use config::{
    BenchConfig, DEFAULT_CACHE_SIZE, DEFAULT_DURATION, DEFAULT_KEY_SIZE, DEFAULT_VALUE_SIZE,
};
pub use driver::{preload, run, run_until, Deadline, Timer};
pub use error::{Error, Result};
pub use memstat::{to_megabytes, CountingAlloc, MemStats};
pub use report::{throughput, Report};
pub use workload::{Mixed, Mode, Op, PureGet, PureSet, Workload};
