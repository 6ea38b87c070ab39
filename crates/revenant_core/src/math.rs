//! Placement types handed to the stage collaborator.
//!
//! The pool never interprets these beyond equality checks on the parent;
//! how a pose is applied is up to the [`Stage`](crate::Stage).

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D vector - positions and velocities.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Returns true if no component is NaN or infinite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Rotation quaternion.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quat {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quat {
    /// Creates a new quaternion.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Rotation of `radians` around the vertical (Y) axis.
    #[must_use]
    pub fn from_yaw(radians: f32) -> Self {
        let half = radians * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    /// Rotates the forward vector (+Z) by this quaternion.
    #[must_use]
    pub fn forward(self) -> Vec3 {
        let Self { x, y, z, w } = self;
        Vec3::new(
            2.0 * (x * z + w * y),
            2.0 * (y * z - w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Identity of a containment context (scene node, group, socket) an
/// instance can be parented under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentId(pub u32);

/// Where an acquired instance should appear.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Containment context, `None` for the scene root.
    pub parent: Option<ParentId>,
}

impl Placement {
    /// Placement at `position` with identity rotation under the scene root.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            parent: None,
        }
    }

    /// Sets the rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the containment context.
    #[must_use]
    pub const fn under(mut self, parent: ParentId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_forward() {
        let fwd = Quat::from_yaw(std::f32::consts::FRAC_PI_2).forward();
        assert!((fwd.x - 1.0).abs() < 1e-5);
        assert!(fwd.z.abs() < 1e-5);
        assert_eq!(Quat::IDENTITY.forward(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_placement_builder() {
        let p = Placement::at(Vec3::new(1.0, 2.0, 3.0)).under(ParentId(9));
        assert_eq!(p.parent, Some(ParentId(9)));
        assert_eq!(p.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_vec3_is_pod() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(bytemuck::bytes_of(&v).len(), 12);
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
    }
}
