//! Physical items and contacts.

use std::sync::Arc;

use orrery_assets::VisualModel;
use orrery_math::{Frame, Vec3};
use serde::{Deserialize, Serialize};

/// What kind of simulated entity an item represents.
///
/// Only affects which overlays apply: bodies get center-of-mass and
/// frame markers, links get link-frame markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Rigid body.
    Body,
    /// One-dimensional rotational element (no spatial overlay).
    Shaft,
    /// Joint or constraint; `frame` is the link frame.
    Link,
    /// Deformable mesh container.
    Mesh,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Body => "body",
            ItemKind::Shaft => "shaft",
            ItemKind::Link => "link",
            ItemKind::Mesh => "mesh",
        }
    }
}

/// A simulated entity, optionally carrying a visual model.
#[derive(Debug, Clone)]
pub struct PhysicalItem {
    /// Human-readable name (logs and exported comments).
    pub name: String,
    pub kind: ItemKind,
    /// World frame of the item.
    pub frame: Frame,
    /// Center of mass relative to `frame`.
    pub com: Frame,
    /// Prescribed world-space linear velocity (m/s).
    pub linear_velocity: Vec3,
    /// Prescribed world-space angular velocity (rad/s).
    pub angular_velocity: Vec3,
    visual_model: Option<Arc<VisualModel>>,
}

impl PhysicalItem {
    /// Creates an item of the given kind at the world origin.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            frame: Frame::IDENTITY,
            com: Frame::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            visual_model: None,
        }
    }

    pub fn body(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Body)
    }

    pub fn link(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Link)
    }

    pub fn shaft(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Shaft)
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.frame.position = position;
        self
    }

    pub fn with_com(mut self, com: Frame) -> Self {
        self.com = com;
        self
    }

    pub fn with_velocity(mut self, linear: Vec3) -> Self {
        self.linear_velocity = linear;
        self
    }

    pub fn with_angular_velocity(mut self, angular: Vec3) -> Self {
        self.angular_velocity = angular;
        self
    }

    pub fn with_visual_model(mut self, model: Arc<VisualModel>) -> Self {
        self.visual_model = Some(model);
        self
    }

    /// Replaces (or removes) the visual model.
    ///
    /// Backends learn about the change on their next `bind_item`/`bind_all`.
    pub fn set_visual_model(&mut self, model: Option<Arc<VisualModel>>) {
        self.visual_model = model;
    }

    #[inline]
    pub fn visual_model(&self) -> Option<&Arc<VisualModel>> {
        self.visual_model.as_ref()
    }

    #[inline]
    pub fn has_visual_model(&self) -> bool {
        self.visual_model.is_some()
    }

    /// World frame of the center of mass.
    #[inline]
    pub fn cog_frame(&self) -> Frame {
        self.frame.compose(&self.com)
    }

    /// Advances the frame by the prescribed velocities.
    pub(crate) fn advance(&mut self, dt: f32) {
        self.frame = self
            .frame
            .advanced(self.linear_velocity, self.angular_velocity, dt);
    }
}

/// A contact reported by the collision pipeline for the current step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact point (world).
    pub position: Vec3,
    /// Unit contact normal (world).
    pub normal: Vec3,
    /// Contact force acting along/around the normal (world).
    pub force: Vec3,
}

impl Contact {
    pub fn new(position: Vec3, normal: Vec3, force: Vec3) -> Self {
        Self {
            position,
            normal,
            force,
        }
    }

    /// Magnitude of the force component along the normal.
    #[inline]
    pub fn normal_force(&self) -> f32 {
        self.force.dot(self.normal).abs()
    }
}
