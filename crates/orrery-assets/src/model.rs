//! Visual models: ordered collections of placed shapes.

use std::sync::Arc;

use orrery_math::Frame;
use orrery_types::AssetKey;

use crate::material::VisualMaterial;
use crate::shape::VisualShape;
use crate::Keyed;

/// One placement of a shape inside a model.
#[derive(Debug, Clone)]
pub struct ShapeInstance {
    pub shape: Arc<VisualShape>,
    /// `None` leaves the appearance to the backend's default.
    pub material: Option<Arc<VisualMaterial>>,
    /// Placement relative to the owning item's frame.
    pub frame: Frame,
}

impl ShapeInstance {
    /// World frame of this instance given the frame of its parent.
    #[inline]
    pub fn world_frame(&self, parent: &Frame) -> Frame {
        parent.compose(&self.frame)
    }
}

/// An ordered sequence of shape instances with a stable identity.
///
/// The key changes only when a new model is built, which lets
/// backends detect "visual model replaced" by key comparison alone.
#[derive(Debug)]
pub struct VisualModel {
    key: AssetKey,
    instances: Vec<ShapeInstance>,
}

impl VisualModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            key: AssetKey::next(),
            instances: Vec::new(),
        }
    }

    /// Model consisting of a single shape at the model origin.
    pub fn from_shape(shape: Arc<VisualShape>, material: Option<Arc<VisualMaterial>>) -> Self {
        Self::new().with_shape(shape, material, Frame::IDENTITY)
    }

    /// Builder: appends a shape instance.
    pub fn with_shape(
        mut self,
        shape: Arc<VisualShape>,
        material: Option<Arc<VisualMaterial>>,
        frame: Frame,
    ) -> Self {
        self.add_shape(shape, material, frame);
        self
    }

    /// Appends a shape instance (only possible before the model is shared).
    pub fn add_shape(
        &mut self,
        shape: Arc<VisualShape>,
        material: Option<Arc<VisualMaterial>>,
        frame: Frame,
    ) {
        self.instances.push(ShapeInstance {
            shape,
            material,
            frame,
        });
    }

    #[inline]
    pub fn instances(&self) -> &[ShapeInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Material of the first instance that has one.
    pub fn primary_material(&self) -> Option<&Arc<VisualMaterial>> {
        self.instances.iter().find_map(|inst| inst.material.as_ref())
    }

    /// Largest distance from the model origin covered by any instance.
    pub fn bounding_radius(&self) -> f32 {
        self.instances
            .iter()
            .map(|inst| inst.frame.position.length() + inst.shape.geometry().bounding_radius())
            .fold(0.0, f32::max)
    }
}

impl Default for VisualModel {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyed for VisualModel {
    fn asset_key(&self) -> AssetKey {
        self.key
    }
}
