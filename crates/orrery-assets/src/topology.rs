//! Mesh topology queries.
//!
//! Builds the unique edge list of a triangle mesh. Edges come out in
//! ascending `(v_min, v_max)` order so that anything derived from them
//! (wireframe cages in exported scripts) is reproducible across runs.

use std::collections::BTreeMap;

use crate::mesh::TriangleMesh;

/// Precomputed topology information for a triangle mesh.
#[derive(Debug, Clone)]
pub struct Topology {
    /// For each vertex, the list of triangles that contain it.
    pub vertex_triangles: Vec<Vec<u32>>,

    /// Unique edges as `[v_min, v_max]` pairs, sorted.
    pub edges: Vec<[u32; 2]>,

    /// For each edge, the adjacent triangles.
    /// Boundary edges have exactly 1 adjacent triangle.
    pub edge_triangles: Vec<Vec<u32>>,
}

impl Topology {
    /// Build topology from a triangle mesh.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let tri_count = mesh.triangle_count();

        let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut edge_map: BTreeMap<(u32, u32), Vec<u32>> = BTreeMap::new();

        for t in 0..tri_count {
            let [a, b, c] = mesh.triangle(t);
            for v in [a, b, c] {
                vertex_triangles[v as usize].push(t as u32);
            }
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edge_map.entry(key).or_default().push(t as u32);
            }
        }

        let mut edges = Vec::with_capacity(edge_map.len());
        let mut edge_triangles = Vec::with_capacity(edge_map.len());
        for ((v0, v1), tris) in edge_map {
            edges.push([v0, v1]);
            edge_triangles.push(tris);
        }

        Self {
            vertex_triangles,
            edges,
            edge_triangles,
        }
    }

    /// Returns the number of boundary edges (edges with only 1 adjacent triangle).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_triangles
            .iter()
            .filter(|tris| tris.len() == 1)
            .count()
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}
