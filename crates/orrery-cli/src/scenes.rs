//! Built-in demo scenes.
//!
//! Items move by prescribed velocities only, so every scene is fully
//! deterministic for a given step size.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use orrery_assets::generators::quad_grid;
use orrery_assets::{VisualMaterial, VisualModel, VisualShape};
use orrery_math::{Color, Frame, Quat, Vec3};
use orrery_physics::{Contact, PhysicalItem, PhysicsSystem, SharedSystem};

/// Available scenes as `(name, description)`.
pub const SCENES: [(&str, &str); 3] = [
    ("pendulum", "Swinging rod and bob around a pivot link"),
    ("shared_materials", "3×3 grid of spheres and boxes sharing two materials"),
    ("mesh_drop", "Wireframe cloth sheet falling onto a floor with contacts"),
];

/// A populated physics system plus a suggested viewpoint.
pub struct DemoScene {
    pub system: SharedSystem,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
}

/// Builds the named scene, or `None` if the name is unknown.
pub fn build(name: &str) -> Option<DemoScene> {
    match name {
        "pendulum" => Some(pendulum()),
        "shared_materials" => Some(shared_materials()),
        "mesh_drop" => Some(mesh_drop()),
        _ => None,
    }
}

pub fn names() -> Vec<&'static str> {
    SCENES.iter().map(|(name, _)| *name).collect()
}

fn floor(material: &Arc<VisualMaterial>) -> PhysicalItem {
    let slab = Arc::new(VisualShape::cuboid(Vec3::new(3.0, 0.05, 3.0)));
    PhysicalItem::body("floor")
        .with_position(Vec3::new(0.0, -0.025, 0.0))
        .with_visual_model(Arc::new(VisualModel::from_shape(slab, Some(Arc::clone(material)))))
}

fn pendulum() -> DemoScene {
    let steel = Arc::new(VisualMaterial::new("steel", Color::GRAY).with_specular(Color::WHITE));
    let brass = Arc::new(VisualMaterial::new("brass", Color::new(0.8, 0.6, 0.2)));
    let concrete = Arc::new(VisualMaterial::new("concrete", Color::new(0.7, 0.7, 0.68)));

    let pivot = Vec3::new(0.0, 1.2, 0.0);
    let arm = VisualModel::new()
        .with_shape(
            Arc::new(VisualShape::cylinder(0.01, 0.8)),
            Some(steel),
            Frame::from_position(Vec3::new(0.0, -0.4, 0.0)),
        )
        .with_shape(
            Arc::new(VisualShape::sphere(0.08)),
            Some(brass),
            Frame::from_position(Vec3::new(0.0, -0.8, 0.0)),
        );

    let mut sys = PhysicsSystem::new();
    sys.add(floor(&concrete));
    sys.add(PhysicalItem::link("pivot").with_position(pivot));
    sys.add(
        PhysicalItem::body("arm")
            .with_frame(Frame::new(pivot, Quat::from_rotation_z(-0.6)))
            .with_com(Frame::from_position(Vec3::new(0.0, -0.7, 0.0)))
            .with_angular_velocity(Vec3::new(0.0, 0.0, 1.2))
            .with_visual_model(Arc::new(arm)),
    );

    DemoScene {
        system: sys.into_shared(),
        camera_position: Vec3::new(0.0, 1.0, -2.5),
        camera_target: Vec3::new(0.0, 0.7, 0.0),
    }
}

fn shared_materials() -> DemoScene {
    let red = Arc::new(VisualMaterial::new("red_plastic", Color::RED).with_roughness(0.05));
    let glass = Arc::new(VisualMaterial::new("glass", Color::new(0.6, 0.8, 1.0)).with_opacity(0.4));
    let concrete = Arc::new(VisualMaterial::new("concrete", Color::new(0.7, 0.7, 0.68)));
    let ball = Arc::new(VisualShape::sphere(0.1));
    let cube = Arc::new(VisualShape::cuboid(Vec3::splat(0.15)));

    let mut sys = PhysicsSystem::new();
    sys.add(floor(&concrete));
    for row in 0..3 {
        for col in 0..3 {
            let index = row * 3 + col;
            let (shape, material) = if index % 2 == 0 {
                (&ball, &red)
            } else {
                (&cube, &glass)
            };
            let model = VisualModel::from_shape(Arc::clone(shape), Some(Arc::clone(material)));
            sys.add(
                PhysicalItem::body(format!("piece_{}", index))
                    .with_position(Vec3::new(col as f32 * 0.4 - 0.4, 0.1, row as f32 * 0.4 - 0.4))
                    .with_velocity(Vec3::new(0.0, 0.05 * (index + 1) as f32, 0.0))
                    .with_angular_velocity(Vec3::new(0.0, 0.5, 0.0))
                    .with_visual_model(Arc::new(model)),
            );
        }
    }

    DemoScene {
        system: sys.into_shared(),
        camera_position: Vec3::new(0.0, 1.5, -2.0),
        camera_target: Vec3::ZERO,
    }
}

fn mesh_drop() -> DemoScene {
    let cloth_mat = Arc::new(VisualMaterial::new("cotton", Color::new(0.2, 0.4, 0.8)));
    let concrete = Arc::new(VisualMaterial::new("concrete", Color::new(0.7, 0.7, 0.68)));
    let sheet = Arc::new(VisualShape::mesh(quad_grid(8, 8, 1.0, 1.0)).with_wireframe(true));

    let mut sys = PhysicsSystem::new();
    sys.add(floor(&concrete));
    sys.add(
        PhysicalItem::body("cloth")
            .with_frame(Frame::new(Vec3::new(0.0, 0.8, 0.0), Quat::from_rotation_x(-FRAC_PI_2)))
            .with_velocity(Vec3::new(0.0, -0.2, 0.0))
            .with_visual_model(Arc::new(VisualModel::from_shape(sheet, Some(cloth_mat)))),
    );

    // Corner supports on the floor, pressed harder toward the back.
    let contacts = [(-0.5, -0.5, 5.0), (0.5, -0.5, 5.0), (-0.5, 0.5, 40.0), (0.5, 0.5, 80.0)]
        .into_iter()
        .map(|(x, z, force)| Contact::new(Vec3::new(x, 0.0, z), Vec3::Y, Vec3::new(0.0, force, 0.0)))
        .collect();
    sys.set_contacts(contacts);

    DemoScene {
        system: sys.into_shared(),
        camera_position: Vec3::new(1.2, 1.4, -1.8),
        camera_target: Vec3::new(0.0, 0.3, 0.0),
    }
}
