//! Visual materials.
//!
//! Appearance parameters map directly onto both backends: the headless
//! rasterizer uses `diffuse`, the script exporter writes every field
//! into a texture declaration.

use std::path::PathBuf;

use orrery_math::Color;
use orrery_types::AssetKey;

use crate::Keyed;

/// Surface appearance of a shape instance.
///
/// Like shapes, materials are identified by key, not by value: two
/// materials with identical colors are still two declarations.
#[derive(Debug)]
pub struct VisualMaterial {
    key: AssetKey,
    /// Human-readable name, written as a comment next to declarations.
    pub name: String,
    /// Base color.
    pub diffuse: Color,
    /// Highlight color.
    pub specular: Color,
    /// 1.0 = opaque, 0.0 = fully transparent.
    pub opacity: f32,
    /// 0.0 = mirror-like, 1.0 = fully matte.
    pub roughness: f32,
    /// Optional image mapped over the surface (format from the extension).
    pub texture: Option<PathBuf>,
}

impl VisualMaterial {
    /// Creates an opaque material with the given base color.
    pub fn new(name: impl Into<String>, diffuse: Color) -> Self {
        Self {
            key: AssetKey::next(),
            name: name.into(),
            diffuse,
            specular: Color::splat(0.1),
            opacity: 1.0,
            roughness: 0.5,
            texture: None,
        }
    }

    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Transmission component (`1 - opacity`).
    #[inline]
    pub fn transmit(&self) -> f32 {
        1.0 - self.opacity
    }
}

impl Keyed for VisualMaterial {
    fn asset_key(&self) -> AssetKey {
        self.key
    }
}
