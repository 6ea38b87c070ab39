//! # Pool Registry
//!
//! Routes spawn and destroy requests to the pool that owns each prototype.
//!
//! ## Lifecycle
//!
//! ```text
//! init(stage, config)   builds every pool, fills them eagerly
//!        │
//!        ▼
//! instantiate / destroy  (many times per tick)
//!        │
//!        ▼
//! dispose()              releases and destroys every pooled instance
//! ```
//!
//! Prototypes without a pool still work: `instantiate` creates an unpooled
//! instance straight from the stage and `destroy` destroys it straight
//! through the stage. Both paths log a warning since they usually mean a
//! missing pool config.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{PoolConfig, PrototypeId, RegistryConfig};
use crate::error::{PoolError, PoolResult};
use crate::math::Placement;
use crate::pool::{next_registry_tag, InstanceHandle, ObjectPool, PoolId, PoolStats};
use crate::stage::Stage;

/// What [`PoolRegistry::instantiate`] produced.
#[derive(Debug)]
#[must_use = "spawned instances must be passed back to PoolRegistry::destroy"]
pub enum Spawned<T> {
    /// Checked out of a pool; the registry still owns the instance.
    Pooled(InstanceHandle),
    /// Created outside any pool; the caller owns it.
    Transient {
        /// The prototype it was created from.
        prototype: PrototypeId,
        /// The unpooled instance.
        object: T,
    },
}

impl<T> Spawned<T> {
    /// The pool handle, if this instance came from a pool.
    #[must_use]
    pub fn handle(&self) -> Option<InstanceHandle> {
        match self {
            Self::Pooled(handle) => Some(*handle),
            Self::Transient { .. } => None,
        }
    }

    /// Whether this instance came from a pool.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        matches!(self, Self::Pooled(_))
    }
}

/// Aggregated counters across every pool plus the fallback paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Number of registered pools.
    pub pools: usize,
    /// Sum of pool capacities.
    pub capacity: usize,
    /// Idle instances across pools.
    pub available: usize,
    /// Active instances across pools.
    pub active: usize,
    /// Summed per-pool counters.
    pub totals: PoolStats,
    /// Unpooled instances created for unregistered prototypes.
    pub fallback_spawns: u64,
    /// Unpooled instances destroyed directly.
    pub fallback_destroys: u64,
}

/// Maps prototypes to their pools and owns the stage they all share.
///
/// Built once at startup with [`PoolRegistry::init`] and torn down with
/// [`PoolRegistry::dispose`] (or [`PoolRegistry::shutdown`], which also hands
/// the stage back).
pub struct PoolRegistry<S: Stage> {
    tag: u32,
    stage: S,
    pools: Vec<ObjectPool<S::Object>>,
    by_prototype: HashMap<PrototypeId, PoolId>,
    fallback_spawns: u64,
    fallback_destroys: u64,
}

impl<S: Stage> PoolRegistry<S> {
    /// Builds one pool per configured prototype.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DuplicatePrototype`] if a prototype is configured
    /// twice, or the validation error of the first invalid pool config. On
    /// error every pool built so far is disposed again.
    pub fn init(stage: S, config: &RegistryConfig) -> PoolResult<Self> {
        let mut registry = Self {
            tag: next_registry_tag(),
            stage,
            pools: Vec::with_capacity(config.pools.len()),
            by_prototype: HashMap::with_capacity(config.pools.len()),
            fallback_spawns: 0,
            fallback_destroys: 0,
        };

        for pool in &config.pools {
            if let Err(err) = registry.register(pool.clone()) {
                registry.dispose();
                return Err(err);
            }
        }

        debug!(pools = registry.pools.len(), "pool registry initialized");
        Ok(registry)
    }

    fn register(&mut self, config: PoolConfig) -> PoolResult<PoolId> {
        if self.by_prototype.contains_key(&config.prototype) {
            return Err(PoolError::DuplicatePrototype(config.prototype));
        }
        let index = u32::try_from(self.pools.len())
            .map_err(|_| PoolError::InvalidConfig("too many pools".to_string()))?;
        let id = PoolId::in_registry(self.tag, index);
        let pool = ObjectPool::new(id, config, &mut self.stage)?;
        self.by_prototype.insert(pool.prototype().clone(), id);
        self.pools.push(pool);
        Ok(id)
    }

    /// Produces an instance of `prototype` at `placement`.
    ///
    /// Pooled prototypes are acquired from their pool. Anything else is
    /// created directly by the stage and returned as
    /// [`Spawned::Transient`]; no pool state changes in that case.
    pub fn instantiate(
        &mut self,
        prototype: &PrototypeId,
        placement: Placement,
    ) -> Spawned<S::Object> {
        if let Some(&id) = self.by_prototype.get(prototype) {
            let handle = self.pools[id.index()].acquire(&placement, &mut self.stage);
            return Spawned::Pooled(handle);
        }

        warn!(
            prototype = %prototype,
            "no pool registered for prototype, creating an unpooled instance"
        );
        self.fallback_spawns += 1;
        Spawned::Transient {
            prototype: prototype.clone(),
            object: self.stage.create(prototype, &placement),
        }
    }

    /// Gives an instance back.
    ///
    /// Pooled instances return to their owning pool. Transient instances
    /// are destroyed through the stage.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolRegistry::return_to_owning_pool`] errors for pooled
    /// instances. Transient instances never fail.
    pub fn destroy(&mut self, spawned: Spawned<S::Object>) -> PoolResult<()> {
        match spawned {
            Spawned::Pooled(handle) => self.return_to_owning_pool(handle),
            Spawned::Transient { prototype, object } => {
                warn!(
                    prototype = %prototype,
                    "destroying an instance no pool owns"
                );
                self.fallback_destroys += 1;
                self.stage.destroy(object);
                Ok(())
            }
        }
    }

    /// Releases `handle` into the pool that issued it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownPool`] if the issuing pool is not part of
    /// this registry (for example after [`PoolRegistry::dispose`]),
    /// [`PoolError::ForeignHandle`] if another registry issued the handle, or
    /// the pool's own release error.
    pub fn return_to_owning_pool(&mut self, handle: InstanceHandle) -> PoolResult<()> {
        let pool = self
            .pools
            .get_mut(handle.pool().index())
            .ok_or(PoolError::UnknownPool(handle.pool()))?;
        pool.release(handle, &mut self.stage)
    }

    /// The pooled instance behind `handle`, if it is still active.
    #[must_use]
    pub fn get(&self, handle: InstanceHandle) -> Option<&S::Object> {
        self.pools.get(handle.pool().index())?.get(handle)
    }

    /// The pooled instance behind `handle`, mutably.
    pub fn get_mut(&mut self, handle: InstanceHandle) -> Option<&mut S::Object> {
        self.pools.get_mut(handle.pool().index())?.get_mut(handle)
    }

    /// The pool serving `prototype`.
    #[must_use]
    pub fn pool(&self, prototype: &PrototypeId) -> Option<&ObjectPool<S::Object>> {
        let id = self.by_prototype.get(prototype)?;
        self.pools.get(id.index())
    }

    /// All pools, in registration order.
    pub fn pools(&self) -> impl Iterator<Item = &ObjectPool<S::Object>> {
        self.pools.iter()
    }

    /// Process-unique tag carried by every [`PoolId`] this registry issues.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Number of registered pools.
    #[inline]
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// The shared stage.
    #[inline]
    #[must_use]
    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// The shared stage, mutably.
    #[inline]
    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    /// Aggregated counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            pools: self.pools.len(),
            fallback_spawns: self.fallback_spawns,
            fallback_destroys: self.fallback_destroys,
            ..RegistryStats::default()
        };
        for pool in &self.pools {
            let pool_stats = pool.stats();
            stats.capacity += pool.capacity();
            stats.available += pool.available_count();
            stats.active += pool.active_count();
            stats.totals.acquisitions += pool_stats.acquisitions;
            stats.totals.releases += pool_stats.releases;
            stats.totals.expansions += pool_stats.expansions;
            stats.totals.forced_releases += pool_stats.forced_releases;
            stats.totals.peak_active += pool_stats.peak_active;
        }
        stats
    }

    /// Releases every active instance in every pool. Returns how many.
    pub fn return_all_instances(&mut self) -> usize {
        let stage = &mut self.stage;
        self.pools
            .iter_mut()
            .map(|pool| pool.return_all_instances(stage))
            .sum()
    }

    /// Disposes every pool and clears the registry.
    ///
    /// Outstanding handles stop resolving. Later `instantiate` calls fall
    /// back to unpooled creation. Calling this twice is harmless.
    pub fn dispose(&mut self) {
        self.by_prototype.clear();
        for pool in self.pools.drain(..) {
            let prototype = pool.prototype().clone();
            let disposal = pool.dispose(&mut self.stage);
            debug!(
                prototype = %prototype,
                returned = disposal.returned,
                destroyed = disposal.destroyed,
                "pool torn down"
            );
        }
    }

    /// Disposes every pool and returns the stage.
    #[must_use]
    pub fn shutdown(mut self) -> S {
        self.dispose();
        self.stage
    }
}
