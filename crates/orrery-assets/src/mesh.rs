//! Triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! Mesh shapes are exported vertex-by-vertex, so the channels are
//! zipped back together at the serialization boundary.

use orrery_math::Vec3;
use orrery_types::{OrreryError, OrreryResult};
use serde::{Deserialize, Serialize};

/// A triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    pub pos_x: Vec<f32>,
    pub pos_y: Vec<f32>,
    pub pos_z: Vec<f32>,

    pub normal_x: Vec<f32>,
    pub normal_y: Vec<f32>,
    pub normal_z: Vec<f32>,

    pub uv_u: Vec<f32>,
    pub uv_v: Vec<f32>,

    // --- Triangle data ---
    /// Triangle indices, stored flat: `[t0v0, t0v1, t0v2, t1v0, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i`.
    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns the normal of vertex `i`.
    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::new(self.normal_x[i], self.normal_y[i], self.normal_z[i])
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// True when every vertex carries a UV coordinate.
    pub fn has_uvs(&self) -> bool {
        !self.uv_u.is_empty() && self.uv_u.len() == self.vertex_count()
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            normal_x: Vec::with_capacity(vertex_capacity),
            normal_y: Vec::with_capacity(vertex_capacity),
            normal_z: Vec::with_capacity(vertex_capacity),
            uv_u: Vec::with_capacity(vertex_capacity),
            uv_v: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.pos_x.len() as u32;
        self.pos_x.push(position.x);
        self.pos_y.push(position.y);
        self.pos_z.push(position.z);
        self.normal_x.push(normal.x);
        self.normal_y.push(normal.y);
        self.normal_z.push(normal.z);
        self.uv_u.push(uv[0]);
        self.uv_v.push(uv[1]);
        index
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.vertex_count() == 0 {
            return None;
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..self.vertex_count() {
            let p = self.position(i);
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length (UVs may be absent)
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    pub fn validate(&self) -> OrreryResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(OrreryError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }
        if self.normal_x.len() != n || self.normal_y.len() != n || self.normal_z.len() != n {
            return Err(OrreryError::InvalidMesh(
                "Normal arrays have inconsistent lengths".into(),
            ));
        }
        if self.uv_u.len() != self.uv_v.len() || (!self.uv_u.is_empty() && self.uv_u.len() != n) {
            return Err(OrreryError::InvalidMesh(
                "UV arrays have inconsistent lengths".into(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(OrreryError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(OrreryError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(OrreryError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        Ok(())
    }

    /// Recomputes area-weighted vertex normals in place.
    pub fn recompute_normals(&mut self) {
        let n = self.vertex_count();
        let mut acc = vec![Vec3::ZERO; n];

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t).map(|v| v as usize);
            let pa = self.position(a);
            // Magnitude is twice the triangle area.
            let face = (self.position(b) - pa).cross(self.position(c) - pa);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }

        self.normal_x.resize(n, 0.0);
        self.normal_y.resize(n, 0.0);
        self.normal_z.resize(n, 0.0);
        for (i, v) in acc.into_iter().enumerate() {
            let nrm = v.try_normalize().unwrap_or(Vec3::ZERO);
            self.normal_x[i] = nrm.x;
            self.normal_y[i] = nrm.y;
            self.normal_z[i] = nrm.z;
        }
    }

    /// Constructs a mesh from interleaved position data `[x0, y0, z0, ...]`.
    ///
    /// Normals are recomputed from the geometry; UVs are kept when one
    /// pair per vertex is supplied and dropped otherwise.
    pub fn from_interleaved(positions: &[f32], indices: &[u32], uvs: &[f32]) -> OrreryResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(OrreryError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for p in positions.chunks_exact(3) {
            mesh.pos_x.push(p[0]);
            mesh.pos_y.push(p[1]);
            mesh.pos_z.push(p[2]);
        }

        if uvs.len() == n * 2 {
            for uv in uvs.chunks_exact(2) {
                mesh.uv_u.push(uv[0]);
                mesh.uv_v.push(uv[1]);
            }
        }

        mesh.indices = indices.to_vec();
        mesh.normal_x.resize(n, 0.0);
        mesh.normal_y.resize(n, 0.0);
        mesh.normal_z.resize(n, 0.0);
        mesh.validate()?;
        mesh.recompute_normals();
        Ok(mesh)
    }
}
