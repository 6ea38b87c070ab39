//! # Poolable Contract
//!
//! Lifecycle hooks for anything that lives inside a pooled instance.

/// Receives spawn/despawn notifications from the pool.
///
/// `on_spawned` runs once per acquisition, after the instance has been
/// placed and reactivated and before the caller sees it. `on_despawned`
/// runs once per release, before the instance is deactivated and parked.
/// Neither can fail.
pub trait Poolable {
    /// The instance has just been handed out. Reset per-use state here.
    fn on_spawned(&mut self);

    /// The instance is going back to the pool. Stop effects, clear timers.
    fn on_despawned(&mut self);
}

/// An instance made of parts, some of which may be [`Poolable`].
///
/// The pool asks for every part once, when the instance is first bound to
/// it, and remembers the indices that answered with a `Poolable`. From then
/// on notifications go to exactly those indices, in ascending order.
///
/// Part layout must not change for the lifetime of the instance.
pub trait Composite {
    /// Number of parts.
    fn part_count(&self) -> usize;

    /// The part at `index` as a [`Poolable`], or `None` if that part does
    /// not take lifecycle notifications.
    fn poolable_part_mut(&mut self, index: usize) -> Option<&mut dyn Poolable>;
}
