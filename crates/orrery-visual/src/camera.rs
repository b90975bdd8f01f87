//! Camera model.

use orrery_math::{Mat4, Vec3};

/// World axis treated as "up" by a backend's cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraVerticalDir {
    #[default]
    Y,
    Z,
}

impl CameraVerticalDir {
    #[inline]
    pub fn up(self) -> Vec3 {
        match self {
            CameraVerticalDir::Y => Vec3::Y,
            CameraVerticalDir::Z => Vec3::Z,
        }
    }
}

/// A viewpoint: eye position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Unit viewing direction, or `None` when position and target coincide.
    pub fn direction(&self) -> Option<Vec3> {
        (self.target - self.position).try_normalize()
    }

    /// Right-handed view matrix.
    ///
    /// Falls back to the next world axis as "up" when looking straight
    /// along the vertical direction.
    pub fn view_matrix(&self, vertical: CameraVerticalDir) -> Mat4 {
        let dir = self.direction().unwrap_or(Vec3::NEG_Z);
        let mut up = vertical.up();
        if dir.cross(up).length_squared() < 1.0e-8 {
            up = match vertical {
                CameraVerticalDir::Y => Vec3::Z,
                CameraVerticalDir::Z => Vec3::X,
            };
        }
        Mat4::look_at_rh(self.position, self.position + dir, up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, -2.0),
            target: Vec3::ZERO,
        }
    }
}
