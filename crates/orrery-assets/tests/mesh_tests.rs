//! Integration tests for orrery-assets.

use std::sync::Arc;

use orrery_assets::generators::{box_mesh, quad_grid, uv_sphere};
use orrery_assets::{Geometry, Keyed, Topology, TriangleMesh, VisualMaterial, VisualModel, VisualShape};
use orrery_math::{Color, Frame, Vec3};

// ─── TriangleMesh Tests ───────────────────────────────────────

fn make_single_triangle() -> TriangleMesh {
    TriangleMesh {
        pos_x: vec![0.0, 1.0, 0.0],
        pos_y: vec![0.0, 0.0, 1.0],
        pos_z: vec![0.0, 0.0, 0.0],
        normal_x: vec![0.0, 0.0, 0.0],
        normal_y: vec![0.0, 0.0, 0.0],
        normal_z: vec![1.0, 1.0, 1.0],
        uv_u: vec![0.0, 1.0, 0.0],
        uv_v: vec![0.0, 0.0, 1.0],
        indices: vec![0, 1, 2],
    }
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert!(mesh.has_uvs());
}

#[test]
fn position_access() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.position(1), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(mesh.triangle(0), [0, 1, 2]);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn validate_catches_inconsistent_lengths() {
    let mut mesh = make_single_triangle();
    mesh.pos_y.push(99.0);
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_oob_index() {
    let mut mesh = make_single_triangle();
    mesh.indices[2] = 7;
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_degenerate() {
    let mut mesh = make_single_triangle();
    mesh.indices = vec![0, 0, 1];
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_allows_missing_uvs() {
    let mut mesh = make_single_triangle();
    mesh.uv_u.clear();
    mesh.uv_v.clear();
    assert!(mesh.validate().is_ok());
    assert!(!mesh.has_uvs());
}

#[test]
fn from_interleaved_computes_normals() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = TriangleMesh::from_interleaved(&positions, &[0, 1, 2], &[]).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert!((mesh.normal(0) - Vec3::Z).length() < 1e-6);
}

#[test]
fn from_interleaved_rejects_bad_index() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    assert!(TriangleMesh::from_interleaved(&positions, &[0, 1, 5], &[]).is_err());
}

#[test]
fn bounds_of_box() {
    let mesh = box_mesh(Vec3::new(1.0, 2.0, 3.0));
    let (min, max) = mesh.bounds().unwrap();
    assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
    assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    assert!(TriangleMesh::default().bounds().is_none());
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_2x2() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert!(mesh.validate().is_ok());
}

#[test]
fn uv_sphere_radius() {
    let mesh = uv_sphere(2.5, 8, 16);
    assert!(mesh.validate().is_ok());
    for i in 0..mesh.vertex_count() {
        assert!((mesh.position(i).length() - 2.5).abs() < 1e-4);
    }
}

#[test]
fn box_mesh_is_closed_per_face() {
    let mesh = box_mesh(Vec3::splat(0.5));
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.validate().is_ok());
}

#[test]
fn box_normals_point_outward() {
    let mesh = box_mesh(Vec3::splat(1.0));
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t).map(|v| v as usize);
        let face = (mesh.position(b) - mesh.position(a)).cross(mesh.position(c) - mesh.position(a));
        let centroid = (mesh.position(a) + mesh.position(b) + mesh.position(c)) / 3.0;
        assert!(face.dot(centroid) > 0.0, "triangle {} faces inward", t);
    }
}

#[test]
fn recomputed_grid_normals_face_z() {
    let mut mesh = quad_grid(4, 4, 1.0, 1.0);
    mesh.recompute_normals();
    for i in 0..mesh.vertex_count() {
        assert!((mesh.normal(i) - Vec3::Z).length() < 1e-5);
    }
}

// ─── Topology Tests ───────────────────────────────────────────

#[test]
fn topology_single_quad() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.edges.len(), 5);
    assert_eq!(topo.boundary_edge_count(), 4);
    assert!(!topo.is_closed());
}

#[test]
fn topology_edges_are_sorted() {
    let mesh = uv_sphere(1.0, 6, 8);
    let topo = Topology::build(&mesh);
    assert!(topo.edges.windows(2).all(|w| w[0] < w[1]));
    assert!(topo.edges.iter().all(|e| e[0] < e[1]));
}

#[test]
fn vertex_triangle_adjacency() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    assert_eq!(topo.vertex_triangles[4].len(), 6);
}

// ─── Asset Identity Tests ─────────────────────────────────────

#[test]
fn equal_shapes_have_distinct_keys() {
    let a = VisualShape::sphere(1.0);
    let b = VisualShape::sphere(1.0);
    assert_ne!(a.asset_key(), b.asset_key());
}

#[test]
fn shared_material_keeps_key() {
    let mat = Arc::new(VisualMaterial::new("steel", Color::GRAY));
    let alias = Arc::clone(&mat);
    assert_eq!(mat.asset_key(), alias.asset_key());
}

#[test]
fn material_builders_clamp() {
    let mat = VisualMaterial::new("glass", Color::WHITE)
        .with_opacity(1.5)
        .with_roughness(-0.2);
    assert_eq!(mat.opacity, 1.0);
    assert_eq!(mat.roughness, 0.0);
    assert_eq!(mat.transmit(), 0.0);
}

#[test]
fn model_keeps_instance_order() {
    let s1 = Arc::new(VisualShape::sphere(0.1));
    let s2 = Arc::new(VisualShape::cuboid(Vec3::ONE));
    let mat = Arc::new(VisualMaterial::new("red", Color::RED));
    let model = VisualModel::new()
        .with_shape(s1.clone(), Some(mat.clone()), Frame::IDENTITY)
        .with_shape(s2.clone(), None, Frame::from_position(Vec3::X));

    assert_eq!(model.len(), 2);
    assert_eq!(model.instances()[0].shape.asset_key(), s1.asset_key());
    assert_eq!(model.instances()[1].shape.asset_key(), s2.asset_key());
    assert_eq!(model.primary_material().unwrap().asset_key(), mat.asset_key());
}

#[test]
fn instance_world_frame_composes() {
    let shape = Arc::new(VisualShape::sphere(0.1));
    let model = VisualModel::new().with_shape(shape, None, Frame::from_position(Vec3::new(0.0, 1.0, 0.0)));
    let parent = Frame::from_position(Vec3::new(2.0, 0.0, 0.0));
    let world = model.instances()[0].world_frame(&parent);
    assert_eq!(world.position, Vec3::new(2.0, 1.0, 0.0));
}

#[test]
fn cuboid_stores_half_lengths() {
    let shape = VisualShape::cuboid(Vec3::new(2.0, 4.0, 6.0));
    match shape.geometry() {
        Geometry::Box { half_lengths } => assert_eq!(*half_lengths, Vec3::new(1.0, 2.0, 3.0)),
        other => panic!("unexpected geometry {:?}", other.kind_name()),
    }
}

#[test]
fn mesh_round_trips_through_json() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: TriangleMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.triangle_count(), 2);
}
