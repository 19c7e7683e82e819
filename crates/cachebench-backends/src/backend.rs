//! Backend selection

use std::fmt;
use std::str::FromStr;

use cachebench::{Cache, Error, Result};

use crate::lru_cache::LruCache;
use crate::moka_cache::MokaCache;
use crate::quick::QuickCache;

/// Cache implementation to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Byte-bounded LRU map ([`LruCache`])
    Lru,
    /// `moka` concurrent cache ([`MokaCache`])
    Moka,
    /// `quick_cache` concurrent cache ([`QuickCache`])
    Quick,
}

impl BackendKind {
    /// Every backend, in display order
    pub const ALL: [BackendKind; 3] = [BackendKind::Lru, BackendKind::Moka, BackendKind::Quick];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Lru => "lru",
            BackendKind::Moka => "moka",
            BackendKind::Quick => "quick",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.to_ascii_lowercase();
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnknownBackend(s.to_string()))
    }
}

/// Create a cache of the given kind.
///
/// # Arguments
/// * `kind` - Backend to construct
/// * `capacity` - Target size in bytes
/// * `value_size` - Per-entry value size hint, used by entry-counted backends
///
/// # Returns
/// * `Result<Box<dyn Cache>>` - Cache handle for a single run
pub fn new_cache(kind: BackendKind, capacity: usize, value_size: usize) -> Result<Box<dyn Cache>> {
    if capacity == 0 {
        return Err(Error::Backend(format!("{} needs a non-zero capacity", kind)));
    }

    let cache: Box<dyn Cache> = match kind {
        BackendKind::Lru => Box::new(LruCache::new(capacity)),
        BackendKind::Moka => Box::new(MokaCache::new(capacity)),
        BackendKind::Quick => Box::new(QuickCache::new(capacity, value_size)),
    };
    Ok(cache)
}
