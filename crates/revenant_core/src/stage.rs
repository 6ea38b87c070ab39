//! # Stage Collaborator
//!
//! The pool decides *when* instances are created, placed, parked and
//! destroyed. The [`Stage`] decides *how*: it is the boundary to whatever
//! scene graph, allocator or entity store the host engine uses.

use crate::config::PrototypeId;
use crate::math::{ParentId, Placement, Quat, Vec3};
use crate::pool::Composite;

/// Factory, destruction and placement services for pooled instances.
///
/// Every pool operation borrows the stage for its duration; the stage must
/// not call back into the pool or registry.
pub trait Stage {
    /// The concrete instance type this stage builds.
    type Object: Composite;

    /// Builds a new instance of `prototype` at `placement`.
    ///
    /// Called while filling a pool, when an `Expand` pool runs dry, and for
    /// unpooled fallback spawns.
    fn create(&mut self, prototype: &PrototypeId, placement: &Placement) -> Self::Object;

    /// Permanently destroys an instance.
    fn destroy(&mut self, object: Self::Object);

    /// Moves an instance to a world pose.
    fn set_pose(&mut self, object: &mut Self::Object, position: Vec3, rotation: Quat);

    /// Current containment context of an instance.
    fn parent_of(&self, object: &Self::Object) -> Option<ParentId>;

    /// Moves an instance into a containment context (`None` = scene root).
    fn set_parent(&mut self, object: &mut Self::Object, parent: Option<ParentId>);

    /// Activates or deactivates an instance.
    fn set_active(&mut self, object: &mut Self::Object, active: bool);
}
