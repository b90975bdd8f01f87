//! Rigid coordinate frames.
//!
//! A [`Frame`] places a child coordinate system inside its parent:
//! `p_parent = rotation * p_child + position`. Frames compose
//! left-to-right, so `parent.compose(&local)` yields the world frame
//! of a shape instance attached to a body.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rigid transform: translation plus unit-quaternion rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Origin of the frame, expressed in the parent frame.
    pub position: Vec3,
    /// Orientation of the frame axes relative to the parent frame.
    pub rotation: Quat,
}

impl Frame {
    /// The identity frame.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a frame from a position and rotation.
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Creates a pure translation.
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Creates a pure rotation.
    #[inline]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation,
        }
    }

    /// Maps a point from this frame to the parent frame.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.position
    }

    /// Rotates a direction from this frame to the parent frame.
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Returns `self ∘ child`: the child frame expressed in this frame's parent.
    #[inline]
    pub fn compose(&self, child: &Frame) -> Frame {
        Frame {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Frame {
        let inv = self.rotation.conjugate();
        Frame {
            position: inv * -self.position,
            rotation: inv,
        }
    }

    /// Rotation as a 3×3 matrix whose columns are the frame axes.
    #[inline]
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_quat(self.rotation)
    }

    /// Unit X axis of the frame in parent coordinates.
    #[inline]
    pub fn axis_x(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Unit Y axis of the frame in parent coordinates.
    #[inline]
    pub fn axis_y(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Unit Z axis of the frame in parent coordinates.
    #[inline]
    pub fn axis_z(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Advances the frame by constant linear and angular velocity
    /// (world-space angular velocity, radians per second).
    pub fn advanced(&self, linear: Vec3, angular: Vec3, dt: f32) -> Frame {
        let position = self.position + linear * dt;
        let angle = angular.length() * dt;
        let rotation = if angle > 0.0 {
            (Quat::from_axis_angle(angular.normalize(), angle) * self.rotation).normalize()
        } else {
            self.rotation
        };
        Frame { position, rotation }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}
