//! # Single-Prototype Pool
//!
//! Owns every instance of one prototype for its whole lifetime.
//!
//! ## Layout
//!
//! ```text
//! slots:     [ s0 | s1 | s2 | s3 | s4 ]     every instance ever created
//! available: [ s4, s1 ]          (top →)   idle, most recently released last
//! active:    { t7: s0, t9: s3, t12: s2 }    acquisition ticket → slot
//! ```
//!
//! A slot is in exactly one of `available` and `active` at any time.
//! Capacity (`slots.len()`) grows only under [`ExhaustionPolicy::Expand`].

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use super::handle::{InstanceHandle, PoolId};
use super::instance::PooledInstance;
use super::poolable::Composite;
use crate::config::{ExhaustionPolicy, HibernationStyle, PoolConfig, PrototypeId};
use crate::error::{PoolError, PoolResult};
use crate::math::{Placement, Quat};
use crate::stage::Stage;

/// Counters kept by every pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Successful acquisitions.
    pub acquisitions: u64,
    /// Releases, including forced and bulk ones.
    pub releases: u64,
    /// Instances created beyond the initial capacity (one per growth step).
    pub expansions: u64,
    /// Active instances reclaimed early by `ReuseOldest`.
    pub forced_releases: u64,
    /// Highest number of simultaneously active instances.
    pub peak_active: usize,
}

/// What [`ObjectPool::dispose`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolDisposal {
    /// Instances that were still active and got released first.
    pub returned: usize,
    /// Instances permanently destroyed.
    pub destroyed: usize,
}

/// One managed instance plus its bookkeeping.
#[derive(Debug)]
struct Slot<T> {
    instance: PooledInstance<T>,
    /// Bumped on every release; handles carry the value they were issued at.
    generation: u64,
    /// Acquisition ticket while active.
    ticket: Option<u64>,
}

/// A pool of reusable instances of a single prototype.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It expects to be driven from one update
/// pass; every operation borrows the [`Stage`] it needs.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool = ObjectPool::new(PoolId::new(0), PoolConfig::new("spark", 32), &mut stage)?;
///
/// let spark = pool.acquire(&Placement::at(hit_point), &mut stage);
/// pool.get_mut(spark).unwrap().ignite();
///
/// pool.release(spark, &mut stage)?;
/// pool.dispose(&mut stage);
/// ```
#[derive(Debug)]
pub struct ObjectPool<T> {
    id: PoolId,
    config: PoolConfig,
    slots: Vec<Slot<T>>,
    /// Idle slot indices, LIFO.
    available: Vec<usize>,
    /// Active slot indices keyed by acquisition ticket; first entry is oldest.
    active: BTreeMap<u64, usize>,
    next_ticket: u64,
    stats: PoolStats,
}

impl<T: Composite> ObjectPool<T> {
    /// Builds a pool and eagerly creates `initial_capacity` idle instances.
    ///
    /// Each instance is bound to this pool, told it despawned, parked at the
    /// safe placement (and deactivated, if configured) before it is made
    /// available.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `config` does not validate.
    pub fn new<S>(id: PoolId, config: PoolConfig, stage: &mut S) -> PoolResult<Self>
    where
        S: Stage<Object = T>,
    {
        config.validate()?;

        let capacity = config.initial_capacity;
        let mut pool = Self {
            id,
            config,
            slots: Vec::with_capacity(capacity),
            available: Vec::with_capacity(capacity),
            active: BTreeMap::new(),
            next_ticket: 0,
            stats: PoolStats::default(),
        };

        for _ in 0..capacity {
            let index = pool.create_idle(stage);
            pool.available.push(index);
        }

        debug!(
            pool = %id,
            prototype = %pool.config.prototype,
            capacity,
            "pool filled"
        );
        Ok(pool)
    }

    /// Hands out an instance placed at `placement`.
    ///
    /// Never fails. If nothing is idle the exhaustion policy runs first:
    /// `Expand` creates one more instance (logged as a warning), while
    /// `ReuseOldest` force-releases the longest-active instance, whose
    /// handle goes stale.
    pub fn acquire<S>(&mut self, placement: &Placement, stage: &mut S) -> InstanceHandle
    where
        S: Stage<Object = T>,
    {
        let index = match self.available.pop() {
            Some(index) => index,
            None => self.reclaim(stage),
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.active.insert(ticket, index);

        let slot = &mut self.slots[index];
        slot.ticket = Some(ticket);

        let object = slot.instance.object_mut();
        stage.set_pose(object, placement.position, placement.rotation);
        if stage.parent_of(object) != placement.parent {
            stage.set_parent(object, placement.parent);
        }
        if self.config.hibernation == HibernationStyle::Deactivate {
            stage.set_active(object, true);
        }
        slot.instance.notify_spawned();

        let handle = InstanceHandle::new(self.id, slot_key(index), slot.generation);
        self.stats.acquisitions += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        trace!(%handle, "instance acquired");
        handle
    }

    /// Returns an active instance to the pool.
    ///
    /// The instance is told it despawned, deactivated (if configured),
    /// detached and moved to the safe placement, then pushed on top of the
    /// available stack. The handle is stale afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ForeignHandle`], [`PoolError::InvalidSlot`],
    /// [`PoolError::StaleHandle`] or [`PoolError::NotActive`] if `handle`
    /// does not name an instance currently active in this pool. Nothing is
    /// changed in that case.
    pub fn release<S>(&mut self, handle: InstanceHandle, stage: &mut S) -> PoolResult<()>
    where
        S: Stage<Object = T>,
    {
        let index = self.resolve(handle)?;
        if let Some(ticket) = self.slots[index].ticket {
            self.active.remove(&ticket);
        }
        self.retire(index, stage);
        self.available.push(index);
        trace!(%handle, "instance released");
        Ok(())
    }

    /// Releases every active instance, oldest first. Returns how many.
    pub fn return_all_instances<S>(&mut self, stage: &mut S) -> usize
    where
        S: Stage<Object = T>,
    {
        let snapshot: Vec<usize> = self.active.values().copied().collect();
        self.active.clear();
        for &index in &snapshot {
            self.retire(index, stage);
            self.available.push(index);
        }
        snapshot.len()
    }

    /// Releases everything still active, then destroys every instance.
    ///
    /// Consumes the pool. Instances that were already idle are not notified
    /// again, so each instance sees exactly one final `on_despawned`.
    pub fn dispose<S>(mut self, stage: &mut S) -> PoolDisposal
    where
        S: Stage<Object = T>,
    {
        let returned = self.return_all_instances(stage);
        self.available.clear();

        let destroyed = self.slots.len();
        for slot in self.slots.drain(..) {
            stage.destroy(slot.instance.into_object());
        }

        debug!(
            pool = %self.id,
            prototype = %self.config.prototype,
            returned,
            destroyed,
            "pool disposed"
        );
        PoolDisposal {
            returned,
            destroyed,
        }
    }

    /// The instance behind an active handle.
    #[must_use]
    pub fn get(&self, handle: InstanceHandle) -> Option<&T> {
        let index = self.resolve(handle).ok()?;
        Some(self.slots[index].instance.object())
    }

    /// The instance behind an active handle, mutably.
    pub fn get_mut(&mut self, handle: InstanceHandle) -> Option<&mut T> {
        let index = self.resolve(handle).ok()?;
        Some(self.slots[index].instance.object_mut())
    }

    /// Whether `handle` still names an active instance of this pool.
    #[must_use]
    pub fn is_active(&self, handle: InstanceHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Handles of all active instances, oldest acquisition first.
    pub fn active_handles(&self) -> impl Iterator<Item = InstanceHandle> + '_ {
        self.active.values().map(move |&index| {
            InstanceHandle::new(self.id, slot_key(index), self.slots[index].generation)
        })
    }

    /// This pool's id in its registry.
    #[inline]
    #[must_use]
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// The prototype this pool serves.
    #[inline]
    #[must_use]
    pub fn prototype(&self) -> &PrototypeId {
        &self.config.prototype
    }

    /// The configuration the pool was built from.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Total managed instances (`available + active`).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Idle instances.
    #[inline]
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Instances currently handed out.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Usage counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Verifies that `available` and `active` are disjoint, that together
    /// they cover every slot, and that slot tickets agree with `active`.
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];

        for &index in &self.available {
            match seen.get_mut(index) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
            if self.slots[index].ticket.is_some() {
                return false;
            }
        }
        for (&ticket, &index) in &self.active {
            match seen.get_mut(index) {
                Some(flag) if !*flag => *flag = true,
                _ => return false,
            }
            if self.slots[index].ticket != Some(ticket) {
                return false;
            }
        }
        seen.into_iter().all(|flag| flag)
    }

    fn resolve(&self, handle: InstanceHandle) -> PoolResult<usize> {
        if handle.pool() != self.id {
            return Err(PoolError::ForeignHandle {
                pool: self.id,
                handle_pool: handle.pool(),
            });
        }
        let index = handle.slot() as usize;
        let slot = self.slots.get(index).ok_or(PoolError::InvalidSlot {
            pool: self.id,
            slot: handle.slot(),
        })?;
        if slot.generation != handle.generation() {
            return Err(PoolError::StaleHandle {
                pool: self.id,
                slot: handle.slot(),
                held: handle.generation(),
                current: slot.generation,
            });
        }
        if slot.ticket.is_none() {
            return Err(PoolError::NotActive {
                pool: self.id,
                slot: handle.slot(),
            });
        }
        Ok(index)
    }

    /// Produces an idle slot when `available` is empty. The returned slot is
    /// not on the available stack.
    fn reclaim<S>(&mut self, stage: &mut S) -> usize
    where
        S: Stage<Object = T>,
    {
        if self.config.exhaustion == ExhaustionPolicy::ReuseOldest {
            if let Some((_, oldest)) = self.active.pop_first() {
                self.retire(oldest, stage);
                self.stats.forced_releases += 1;
                debug!(
                    pool = %self.id,
                    prototype = %self.config.prototype,
                    slot = oldest,
                    "pool ran dry, reclaimed oldest active instance"
                );
                return oldest;
            }
        }

        let index = self.create_idle(stage);
        self.stats.expansions += 1;
        warn!(
            pool = %self.id,
            prototype = %self.config.prototype,
            capacity = self.slots.len(),
            "pool ran dry, expanded capacity"
        );
        index
    }

    /// Creates, binds and parks a new instance. Returns its slot index.
    fn create_idle<S>(&mut self, stage: &mut S) -> usize
    where
        S: Stage<Object = T>,
    {
        let object = stage.create(
            &self.config.prototype,
            &Placement::at(self.config.safe_placement),
        );
        let mut instance = PooledInstance::bound(object, self.id);
        instance.notify_despawned();
        park(&self.config, instance.object_mut(), stage);

        let index = self.slots.len();
        self.slots.push(Slot {
            instance,
            generation: 0,
            ticket: None,
        });
        index
    }

    /// Notifies, parks and invalidates an active slot. The caller has already
    /// taken it out of `active` and decides where it goes next.
    fn retire<S>(&mut self, index: usize, stage: &mut S)
    where
        S: Stage<Object = T>,
    {
        let slot = &mut self.slots[index];
        slot.instance.notify_despawned();
        park(&self.config, slot.instance.object_mut(), stage);
        slot.ticket = None;
        // 64 bits: one slot cannot be released often enough to wrap.
        slot.generation = slot.generation.wrapping_add(1);
        self.stats.releases += 1;
    }
}

/// Deactivates (if configured), detaches and moves an instance off-stage.
fn park<S: Stage>(config: &PoolConfig, object: &mut S::Object, stage: &mut S) {
    if config.hibernation == HibernationStyle::Deactivate {
        stage.set_active(object, false);
    }
    if stage.parent_of(object).is_some() {
        stage.set_parent(object, None);
    }
    stage.set_pose(object, config.safe_placement, Quat::IDENTITY);
}

#[allow(clippy::cast_possible_truncation)]
fn slot_key(index: usize) -> u32 {
    index as u32
}
