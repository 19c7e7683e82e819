//! Process heap statistics
//!
//! Counters are fed by [`CountingAlloc`], which the benchmark binary installs
//! as its `#[global_allocator]`. Without it every counter reads zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static ALLOCATED: AtomicU64 = AtomicU64::new(0);
static TOTAL_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static PEAK: AtomicU64 = AtomicU64::new(0);
static MALLOCS: AtomicU64 = AtomicU64::new(0);
static FREES: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper that counts heap traffic
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: CountingAlloc = CountingAlloc::system();
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAlloc<A = System> {
    inner: A,
}

impl CountingAlloc<System> {
    /// Count allocations served by the system allocator
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> CountingAlloc<A> {
    /// Count allocations served by `inner`
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn record_alloc(size: usize) {
    let size = size as u64;
    let live = ALLOCATED.fetch_add(size, Ordering::Relaxed) + size;
    TOTAL_ALLOCATED.fetch_add(size, Ordering::Relaxed);
    MALLOCS.fetch_add(1, Ordering::Relaxed);
    PEAK.fetch_max(live, Ordering::Relaxed);
}

fn record_free(size: usize) {
    ALLOCATED.fetch_sub(size as u64, Ordering::Relaxed);
    FREES.fetch_add(1, Ordering::Relaxed);
}

unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAlloc<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        record_free(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            // Counted as a free of the old block plus a fresh allocation
            record_free(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Snapshot of heap counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemStats {
    /// Bytes currently allocated
    pub alloc: u64,
    /// Bytes allocated over the life of the process
    pub total_alloc: u64,
    /// High-water mark of allocated bytes
    pub sys: u64,
    /// Number of allocations
    pub mallocs: u64,
    /// Number of frees
    pub frees: u64,
}

impl MemStats {
    /// Read the current counters.
    ///
    /// Counters are loaded one by one while other threads may allocate, so
    /// the snapshot is not transactional.
    pub fn snapshot() -> Self {
        Self {
            alloc: ALLOCATED.load(Ordering::Relaxed),
            total_alloc: TOTAL_ALLOCATED.load(Ordering::Relaxed),
            sys: PEAK.load(Ordering::Relaxed),
            mallocs: MALLOCS.load(Ordering::Relaxed),
            frees: FREES.load(Ordering::Relaxed),
        }
    }
}

/// Whole mebibytes in `bytes`
pub fn to_megabytes(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}
