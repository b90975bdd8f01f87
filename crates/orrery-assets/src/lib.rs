//! # orrery-assets
//!
//! The visual-asset model shared by physics items, visualization
//! backends and the offline exporter.
//!
//! ## Key Types
//!
//! - [`VisualModel`]: Ordered shape instances `(shape, material, local frame)`.
//! - [`VisualShape`]: Geometry plus a stable [`AssetKey`](orrery_types::AssetKey).
//! - [`VisualMaterial`]: Surface appearance plus a stable key.
//! - [`TriangleMesh`]: SoA triangle mesh used by mesh shapes.
//! - [`Topology`]: Deterministic edge list (wireframe export).
//!
//! Assets are immutable once wrapped in an `Arc`; replacing an item's
//! model means attaching a new `Arc<VisualModel>` with a new key.

pub mod generators;
pub mod material;
pub mod mesh;
pub mod model;
pub mod shape;
pub mod topology;

pub use material::VisualMaterial;
pub use mesh::TriangleMesh;
pub use model::{ShapeInstance, VisualModel};
pub use shape::{Geometry, VisualShape};
pub use topology::Topology;

use orrery_types::AssetKey;

/// Assets that carry a stable identity key.
pub trait Keyed {
    /// Returns the identity assigned at creation time.
    fn asset_key(&self) -> AssetKey;
}
