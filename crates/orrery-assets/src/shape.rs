//! Visual shapes.
//!
//! A [`VisualShape`] is pure geometry expressed in its own local frame.
//! Placement comes from the [`ShapeInstance`](crate::ShapeInstance) that
//! references it, so one shape can be instanced many times.

use orrery_math::Vec3;
use orrery_types::AssetKey;

use crate::mesh::TriangleMesh;
use crate::Keyed;

/// Primitive or mesh geometry.
///
/// Cylinders and capsules are aligned with the local Y axis and
/// centered at the origin.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere { radius: f32 },
    Ellipsoid { semi_axes: Vec3 },
    Box { half_lengths: Vec3 },
    Cylinder { radius: f32, height: f32 },
    Capsule { radius: f32, height: f32 },
    Mesh(TriangleMesh),
}

impl Geometry {
    /// Short lowercase label used in logs and exported comments.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => "sphere",
            Geometry::Ellipsoid { .. } => "ellipsoid",
            Geometry::Box { .. } => "box",
            Geometry::Cylinder { .. } => "cylinder",
            Geometry::Capsule { .. } => "capsule",
            Geometry::Mesh(_) => "mesh",
        }
    }

    /// Radius of a sphere centered at the local origin enclosing the geometry.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Geometry::Sphere { radius } => *radius,
            Geometry::Ellipsoid { semi_axes } => semi_axes.max_element(),
            Geometry::Box { half_lengths } => half_lengths.length(),
            Geometry::Cylinder { radius, height } => (radius * radius + 0.25 * height * height).sqrt(),
            Geometry::Capsule { radius, height } => 0.5 * height + radius,
            Geometry::Mesh(mesh) => (0..mesh.vertex_count())
                .map(|i| mesh.position(i).length())
                .fold(0.0, f32::max),
        }
    }
}

/// A shape with a stable identity.
///
/// Deliberately not `Clone`: copies would share the key and therefore be
/// treated as the same asset. Share shapes through `Arc` instead.
#[derive(Debug)]
pub struct VisualShape {
    key: AssetKey,
    geometry: Geometry,
    /// Render meshes as a cage of edges instead of filled triangles.
    wireframe: bool,
}

impl VisualShape {
    /// Creates a shape with a freshly allocated key.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            key: AssetKey::next(),
            geometry,
            wireframe: false,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::new(Geometry::Sphere { radius })
    }

    pub fn ellipsoid(semi_axes: Vec3) -> Self {
        Self::new(Geometry::Ellipsoid { semi_axes })
    }

    /// Box with full edge lengths `size`.
    pub fn cuboid(size: Vec3) -> Self {
        Self::new(Geometry::Box {
            half_lengths: size * 0.5,
        })
    }

    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::new(Geometry::Cylinder { radius, height })
    }

    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::new(Geometry::Capsule { radius, height })
    }

    pub fn mesh(mesh: TriangleMesh) -> Self {
        Self::new(Geometry::Mesh(mesh))
    }

    /// Builder: toggles wireframe rendering (meaningful for meshes only).
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn is_wireframe(&self) -> bool {
        self.wireframe
    }
}

impl Keyed for VisualShape {
    fn asset_key(&self) -> AssetKey {
        self.key
    }
}
