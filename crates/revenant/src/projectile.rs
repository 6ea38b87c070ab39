//! # Projectiles
//!
//! The pooled object of the demo. A projectile is a composite of three
//! parts; two of them take lifecycle notifications:
//!
//! | index | part       | poolable | on spawn            | on despawn        |
//! |-------|------------|----------|---------------------|-------------------|
//! | 0     | `Body`     | no       |                     |                   |
//! | 1     | `Lifetime` | yes      | rewind the countdown | zero it           |
//! | 2     | `Trail`    | yes      | start emitting       | stop, drop points |

use std::collections::VecDeque;

use revenant_core::{Composite, ParentId, Poolable, PrototypeId, Quat, Vec3};

use crate::scene::{NodeId, ProjectileSpec};

/// Collision shape and payload. Not poolable: it never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Collision radius.
    pub radius: f32,
    /// Damage dealt on hit.
    pub damage: u32,
}

/// Countdown until the projectile should be returned.
#[derive(Clone, Debug, PartialEq)]
pub struct Lifetime {
    duration: f32,
    remaining: f32,
    spawns: u32,
}

impl Lifetime {
    /// A lifetime of `duration` seconds, not yet running.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
            spawns: 0,
        }
    }

    /// Seconds left.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// How many times the owning projectile has been spawned.
    #[must_use]
    pub fn spawns(&self) -> u32 {
        self.spawns
    }

    /// Advances the countdown; true once it has run out.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

impl Poolable for Lifetime {
    fn on_spawned(&mut self) {
        self.remaining = self.duration;
        self.spawns += 1;
    }

    fn on_despawned(&mut self) {
        self.remaining = 0.0;
    }
}

/// Ring buffer of recent positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec3>,
    max_points: usize,
    emitting: bool,
}

impl Trail {
    /// An idle trail keeping up to `max_points` points.
    #[must_use]
    pub fn new(max_points: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_points),
            max_points,
            emitting: false,
        }
    }

    /// Appends a point while emitting, dropping the oldest when full.
    pub fn record(&mut self, point: Vec3) {
        if !self.emitting || self.max_points == 0 {
            return;
        }
        if self.points.len() == self.max_points {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Recorded points, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the trail is recording.
    #[must_use]
    pub fn is_emitting(&self) -> bool {
        self.emitting
    }
}

impl Poolable for Trail {
    fn on_spawned(&mut self) {
        self.points.clear();
        self.emitting = true;
    }

    fn on_despawned(&mut self) {
        self.emitting = false;
        self.points.clear();
    }
}

/// A scene object fired by a turret.
#[derive(Clone, Debug)]
pub struct Projectile {
    /// Scene node backing this projectile.
    pub node: NodeId,
    /// Prototype it was built from.
    pub prototype: PrototypeId,
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Containment context.
    pub parent: Option<ParentId>,
    /// Whether the node takes part in the simulation.
    pub active: bool,
    /// Units per second.
    pub velocity: Vec3,
    /// Collision part.
    pub body: Body,
    /// Expiry part.
    pub lifetime: Lifetime,
    /// Visual trail part.
    pub trail: Trail,
}

impl Projectile {
    /// Builds an idle projectile from its prototype spec.
    #[must_use]
    pub fn new(node: NodeId, prototype: PrototypeId, spec: &ProjectileSpec) -> Self {
        Self {
            node,
            prototype,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent: None,
            active: true,
            velocity: Vec3::ZERO,
            body: Body {
                radius: spec.radius,
                damage: spec.damage,
            },
            lifetime: Lifetime::new(spec.lifetime_secs),
            trail: Trail::new(spec.trail_points),
        }
    }

    /// Sets the flight velocity.
    pub fn launch(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Moves the projectile one step. Returns true once it has expired.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return true;
        }
        self.position += self.velocity * dt;
        self.trail.record(self.position);
        self.lifetime.tick(dt)
    }
}

impl Composite for Projectile {
    fn part_count(&self) -> usize {
        3
    }

    fn poolable_part_mut(&mut self, index: usize) -> Option<&mut dyn Poolable> {
        match index {
            1 => Some(&mut self.lifetime),
            2 => Some(&mut self.trail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> Projectile {
        let spec = ProjectileSpec {
            lifetime_secs: 0.5,
            trail_points: 3,
            ..ProjectileSpec::default()
        };
        Projectile::new(NodeId(1), PrototypeId::new("bolt"), &spec)
    }

    #[test]
    fn test_lifetime_rewinds_on_spawn() {
        let mut bolt = bolt();
        bolt.lifetime.on_spawned();
        assert!(!bolt.advance(0.25));
        assert!(bolt.advance(0.25));

        bolt.lifetime.on_despawned();
        bolt.lifetime.on_spawned();
        assert!((bolt.lifetime.remaining() - 0.5).abs() < f32::EPSILON);
        assert_eq!(bolt.lifetime.spawns(), 2);
    }

    #[test]
    fn test_trail_only_records_while_emitting() {
        let mut bolt = bolt();
        bolt.launch(Vec3::new(1.0, 0.0, 0.0));
        bolt.advance(0.1);
        assert!(bolt.trail.is_empty());

        bolt.trail.on_spawned();
        for _ in 0..5 {
            bolt.advance(0.1);
        }
        assert_eq!(bolt.trail.len(), 3);
        let newest = bolt.trail.points().last().copied().unwrap();
        assert_eq!(newest, bolt.position);

        bolt.trail.on_despawned();
        assert!(bolt.trail.is_empty());
        assert!(!bolt.trail.is_emitting());
    }

    #[test]
    fn test_inactive_projectile_counts_as_expired() {
        let mut bolt = bolt();
        bolt.active = false;
        bolt.launch(Vec3::new(1.0, 0.0, 0.0));
        assert!(bolt.advance(1.0));
        assert_eq!(bolt.position, Vec3::ZERO);
    }

    #[test]
    fn test_poolable_parts() {
        let mut bolt = bolt();
        assert_eq!(bolt.part_count(), 3);
        assert!(bolt.poolable_part_mut(0).is_none());
        assert!(bolt.poolable_part_mut(1).is_some());
        assert!(bolt.poolable_part_mut(2).is_some());
        assert!(bolt.poolable_part_mut(3).is_none());
    }
}
