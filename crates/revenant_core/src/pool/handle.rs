//! # Pool Handles
//!
//! Handles are lightweight identifiers consisting of:
//! - The owning pool: its registry tag and its index in that registry
//! - A slot index inside that pool
//! - A 64-bit generation counter, bumped on every release

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Tag of a pool that was built outside any registry.
pub const STANDALONE_REGISTRY: u32 = 0;

static NEXT_REGISTRY_TAG: AtomicU32 = AtomicU32::new(STANDALONE_REGISTRY + 1);

/// Hands out a registry tag no other live registry in this process uses.
pub(crate) fn next_registry_tag() -> u32 {
    loop {
        let tag = NEXT_REGISTRY_TAG.fetch_add(1, Ordering::Relaxed);
        if tag != STANDALONE_REGISTRY {
            return tag;
        }
    }
}

/// Identity of a pool: the registry it belongs to plus its index there.
///
/// This is the non-owning back-reference a pooled instance keeps to its
/// pool: a lookup key, not a pointer. Two registries never share a tag, so
/// a handle from one is foreign to every pool of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId {
    registry: u32,
    index: u32,
}

impl PoolId {
    /// Id of a standalone pool (not owned by a registry).
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self::in_registry(STANDALONE_REGISTRY, index)
    }

    /// Id of the pool at `index` inside the registry tagged `registry`.
    #[inline]
    #[must_use]
    pub const fn in_registry(registry: u32, index: u32) -> Self {
        Self { registry, index }
    }

    /// Returns the registry index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the registry tag, [`STANDALONE_REGISTRY`] outside a registry.
    #[inline]
    #[must_use]
    pub const fn registry(self) -> u32 {
        self.registry
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.registry == STANDALONE_REGISTRY {
            write!(f, "pool#{}", self.index)
        } else {
            write!(f, "pool#{}@r{}", self.index, self.registry)
        }
    }
}

/// Handle to an instance checked out of a pool.
///
/// Once the instance is released (by its holder, by a bulk reset, or by a
/// `ReuseOldest` eviction) the slot generation moves on and the handle stops
/// resolving. Generations are 64-bit; a slot would need 2^64 releases before
/// an old handle could match again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    pool: PoolId,
    slot: u32,
    generation: u64,
}

impl InstanceHandle {
    #[inline]
    pub(crate) const fn new(pool: PoolId, slot: u32, generation: u64) -> Self {
        Self {
            pool,
            slot,
            generation,
        }
    }

    /// Returns the pool that issued this handle.
    #[inline]
    #[must_use]
    pub const fn pool(self) -> PoolId {
        self.pool
    }

    /// Returns the slot index inside the owning pool.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the generation this handle was issued at.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}v{}", self.pool, self.slot, self.generation)
    }
}
