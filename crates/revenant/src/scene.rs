//! # Scene
//!
//! In-memory stand-in for an engine scene graph. Builds projectiles from a
//! catalog of prototype specs and counts every call the pools make, so a
//! run can be checked for leaks and churn afterwards.

use std::collections::BTreeMap;

use revenant_core::{ParentId, Placement, PrototypeId, Quat, Stage, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::projectile::Projectile;

/// Identifier of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// How to build a projectile prototype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSpec {
    /// Seconds a projectile flies before it is returned.
    pub lifetime_secs: f32,
    /// Collision radius.
    pub radius: f32,
    /// Damage on hit.
    pub damage: u32,
    /// Trail length in points.
    pub trail_points: usize,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            lifetime_secs: 1.0,
            radius: 0.1,
            damage: 1,
            trail_points: 8,
        }
    }
}

/// Counters of everything the scene was asked to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Nodes created.
    pub created: u64,
    /// Nodes destroyed.
    pub destroyed: u64,
    /// Pose writes.
    pub pose_updates: u64,
    /// Parent changes.
    pub reparents: u64,
    /// Activations.
    pub activations: u64,
    /// Deactivations.
    pub deactivations: u64,
}

impl SceneStats {
    /// Nodes created but not yet destroyed.
    #[must_use]
    pub fn live(&self) -> u64 {
        self.created.saturating_sub(self.destroyed)
    }
}

/// The demo's [`Stage`].
#[derive(Debug, Default)]
pub struct SceneStage {
    catalog: BTreeMap<PrototypeId, ProjectileSpec>,
    next_node: u32,
    stats: SceneStats,
}

impl SceneStage {
    /// An empty scene with no prototypes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a prototype in the catalog.
    #[must_use]
    pub fn with_prototype(mut self, prototype: impl Into<PrototypeId>, spec: ProjectileSpec) -> Self {
        self.register(prototype, spec);
        self
    }

    /// Adds or replaces a prototype in the catalog.
    pub fn register(&mut self, prototype: impl Into<PrototypeId>, spec: ProjectileSpec) {
        self.catalog.insert(prototype.into(), spec);
    }

    /// Spec for `prototype`, if catalogued.
    #[must_use]
    pub fn spec(&self, prototype: &PrototypeId) -> Option<&ProjectileSpec> {
        self.catalog.get(prototype)
    }

    /// Call counters so far.
    #[must_use]
    pub fn stats(&self) -> SceneStats {
        self.stats
    }
}

impl Stage for SceneStage {
    type Object = Projectile;

    fn create(&mut self, prototype: &PrototypeId, placement: &Placement) -> Projectile {
        let spec = self.catalog.get(prototype).copied().unwrap_or_else(|| {
            debug!(prototype = %prototype, "prototype not catalogued, using default spec");
            ProjectileSpec::default()
        });
        let node = NodeId(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        self.stats.created += 1;
        trace!(node = node.0, prototype = %prototype, "node created");

        let mut projectile = Projectile::new(node, prototype.clone(), &spec);
        projectile.position = placement.position;
        projectile.rotation = placement.rotation;
        projectile.parent = placement.parent;
        projectile
    }

    fn destroy(&mut self, object: Projectile) {
        self.stats.destroyed += 1;
        trace!(node = object.node.0, "node destroyed");
    }

    fn set_pose(&mut self, object: &mut Projectile, position: Vec3, rotation: Quat) {
        object.position = position;
        object.rotation = rotation;
        self.stats.pose_updates += 1;
    }

    fn parent_of(&self, object: &Projectile) -> Option<ParentId> {
        object.parent
    }

    fn set_parent(&mut self, object: &mut Projectile, parent: Option<ParentId>) {
        object.parent = parent;
        self.stats.reparents += 1;
    }

    fn set_active(&mut self, object: &mut Projectile, active: bool) {
        object.active = active;
        if active {
            self.stats.activations += 1;
        } else {
            self.stats.deactivations += 1;
        }
    }
}
