//! Pool-scoped factory handles.
//!
//! A handle names one factory inside one worker pool. Every worker of the
//! pool registers its own copy of the factory under the same handle, so a
//! dispatch message carries the handle instead of the factory itself.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_POOL: AtomicU32 = AtomicU32::new(1);

/// Allocates a fresh pool id.
///
/// Ids are never reused within a process, so handles of a torn-down pool
/// cannot resolve in a later one.
#[must_use]
pub fn next_pool_id() -> u32 {
    NEXT_POOL.fetch_add(1, Ordering::Relaxed)
}

/// A handle to a factory registered in a worker pool.
///
/// This is a lightweight 64-bit value that can be copied freely.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryHandle {
    pool: u32,
    slot: u32,
}

impl FactoryHandle {
    /// Creates a handle from a pool id and a slot.
    #[must_use]
    pub const fn new(pool: u32, slot: u32) -> Self {
        Self { pool, slot }
    }

    /// Returns the id of the issuing pool.
    #[must_use]
    pub const fn pool(self) -> u32 {
        self.pool
    }

    /// Returns the slot within the pool.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }
}

impl fmt::Debug for FactoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({}:{})", self.pool, self.slot)
    }
}

impl fmt::Display for FactoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.pool, self.slot)
    }
}
