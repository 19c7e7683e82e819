//! # cachebench-backends
//!
//! Cache implementations adapted to the [`cachebench::Cache`] trait.
//!
//! ## Backends
//! - **lru**: byte-bounded LRU map (AHash index, slot-linked list)
//! - **moka**: `moka::sync::Cache` weighted by entry size
//! - **quick**: `quick_cache::sync::Cache` weighted by entry size
//!
//! Every adapter counts hits, misses and stores on top of whatever the
//! backend reports itself.

#![warn(missing_docs)]

mod backend;
mod lru;
mod lru_cache;
mod moka_cache;
mod quick;
mod stats;

pub use backend::{new_cache, BackendKind};
pub use lru::{LruMap, Put};
pub use lru_cache::LruCache;
pub use moka_cache::MokaCache;
pub use quick::{ByteWeighter, QuickCache};
pub use stats::CacheStats;
