//! # Pooled Instance Wrapper
//!
//! Binds one concrete instance to its owning pool and caches which of its
//! parts take lifecycle notifications.

use super::handle::PoolId;
use super::poolable::Composite;
use crate::error::{PoolError, PoolResult};

/// A pool-managed instance.
///
/// Created unbound with [`PooledInstance::new`]; bound exactly once with
/// [`PooledInstance::initialize`], which also discovers the instance's
/// [`Poolable`](super::Poolable) parts. The discovered list is fixed from
/// then on.
#[derive(Debug)]
pub struct PooledInstance<T> {
    /// The wrapped instance.
    object: T,
    /// Owning pool, `None` until initialized.
    owner: Option<PoolId>,
    /// Indices of poolable parts, in notification order.
    poolable_parts: Vec<usize>,
}

impl<T: Composite> PooledInstance<T> {
    /// Wraps an instance without binding it to a pool.
    #[must_use]
    pub fn new(object: T) -> Self {
        Self {
            object,
            owner: None,
            poolable_parts: Vec::new(),
        }
    }

    /// Wraps and binds in one step. Used by pools for fresh instances.
    pub(crate) fn bound(object: T, owner: PoolId) -> Self {
        let mut instance = Self::new(object);
        instance.bind(owner);
        instance
    }

    /// Binds the instance to `owner` and discovers its poolable parts.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyInitialized`] if the instance was already
    /// bound; the existing binding is left untouched.
    pub fn initialize(&mut self, owner: PoolId) -> PoolResult<()> {
        if let Some(existing) = self.owner {
            return Err(PoolError::AlreadyInitialized(existing));
        }
        self.bind(owner);
        Ok(())
    }

    fn bind(&mut self, owner: PoolId) {
        let object = &mut self.object;
        self.poolable_parts = (0..object.part_count())
            .filter(|&index| object.poolable_part_mut(index).is_some())
            .collect();
        self.owner = Some(owner);
    }

    /// Fans `on_spawned` out to every poolable part in discovery order.
    pub fn notify_spawned(&mut self) {
        for &index in &self.poolable_parts {
            if let Some(part) = self.object.poolable_part_mut(index) {
                part.on_spawned();
            }
        }
    }

    /// Fans `on_despawned` out to every poolable part in discovery order.
    pub fn notify_despawned(&mut self) {
        for &index in &self.poolable_parts {
            if let Some(part) = self.object.poolable_part_mut(index) {
                part.on_despawned();
            }
        }
    }

    /// The pool this instance belongs to.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> Option<PoolId> {
        self.owner
    }

    /// Number of parts that receive lifecycle notifications.
    #[inline]
    #[must_use]
    pub fn poolable_part_count(&self) -> usize {
        self.poolable_parts.len()
    }

    /// The wrapped instance.
    #[inline]
    #[must_use]
    pub fn object(&self) -> &T {
        &self.object
    }

    /// The wrapped instance, mutably.
    #[inline]
    pub fn object_mut(&mut self) -> &mut T {
        &mut self.object
    }

    /// Unwraps the instance, dropping the pool binding.
    #[must_use]
    pub fn into_object(self) -> T {
        self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Poolable;

    #[derive(Default)]
    struct Counter {
        spawned: u32,
        despawned: u32,
    }

    impl Poolable for Counter {
        fn on_spawned(&mut self) {
            self.spawned += 1;
        }

        fn on_despawned(&mut self) {
            self.despawned += 1;
        }
    }

    /// Parts: counter, plain, counter.
    #[derive(Default)]
    struct Widget {
        first: Counter,
        plain: u32,
        second: Counter,
    }

    impl Composite for Widget {
        fn part_count(&self) -> usize {
            3
        }

        fn poolable_part_mut(&mut self, index: usize) -> Option<&mut dyn Poolable> {
            match index {
                0 => Some(&mut self.first),
                2 => Some(&mut self.second),
                _ => None,
            }
        }
    }

    #[test]
    fn test_initialize_discovers_poolable_parts() {
        let mut instance = PooledInstance::new(Widget::default());
        assert_eq!(instance.owner(), None);
        assert_eq!(instance.poolable_part_count(), 0);

        instance.initialize(PoolId::new(1)).unwrap();
        assert_eq!(instance.owner(), Some(PoolId::new(1)));
        assert_eq!(instance.poolable_part_count(), 2);
    }

    #[test]
    fn test_double_initialize_rejected() {
        let mut instance = PooledInstance::bound(Widget::default(), PoolId::new(4));
        assert_eq!(
            instance.initialize(PoolId::new(5)),
            Err(PoolError::AlreadyInitialized(PoolId::new(4)))
        );
        assert_eq!(instance.owner(), Some(PoolId::new(4)));
    }

    #[test]
    fn test_notifications_reach_every_poolable_part() {
        let mut instance = PooledInstance::bound(Widget::default(), PoolId::new(0));
        instance.notify_spawned();
        instance.notify_despawned();
        instance.notify_spawned();

        let widget = instance.into_object();
        assert_eq!(widget.first.spawned, 2);
        assert_eq!(widget.second.spawned, 2);
        assert_eq!(widget.first.despawned, 1);
        assert_eq!(widget.second.despawned, 1);
        assert_eq!(widget.plain, 0);
    }

    #[test]
    fn test_unbound_instance_notifies_nothing() {
        let mut instance = PooledInstance::new(Widget::default());
        instance.notify_spawned();
        assert_eq!(instance.object().first.spawned, 0);
    }
}
