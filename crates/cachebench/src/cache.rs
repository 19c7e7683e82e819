//! Capability interface every benchmarked cache is adapted to

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Backend-specific statistics, keyed by counter name.
///
/// Ordered so that rendered reports are stable between runs.
pub type Stats = BTreeMap<String, StatValue>;

/// A single statistic reported by a cache backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    /// Counter or size
    Unsigned(u64),
    /// Signed quantity
    Signed(i64),
    /// Ratio or average
    Float(f64),
    /// Free-form value
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Unsigned(v) => write!(f, "{}", v),
            StatValue::Signed(v) => write!(f, "{}", v),
            StatValue::Float(v) => write!(f, "{}", v),
            StatValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<u64> for StatValue {
    fn from(v: u64) -> Self {
        StatValue::Unsigned(v)
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Unsigned(v as u64)
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Signed(v)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<String> for StatValue {
    fn from(v: String) -> Self {
        StatValue::Text(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

/// In-memory cache under benchmark.
///
/// Implementations must not fail: a missing key is reported as `None`, and
/// a `set` that the backend decides to drop (for example because it is full)
/// is silently accepted.
pub trait Cache {
    /// Store `value` under `key`, overwriting any previous value
    fn set(&self, key: &[u8], value: &[u8]);

    /// Look up the value stored under `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Snapshot of the statistics maintained by the backend itself.
    ///
    /// Backends without statistics return an empty map.
    fn stat(&self) -> Stats;
}

impl<C: Cache + ?Sized> Cache for Box<C> {
    fn set(&self, key: &[u8], value: &[u8]) {
        (**self).set(key, value)
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn stat(&self) -> Stats {
        (**self).stat()
    }
}
