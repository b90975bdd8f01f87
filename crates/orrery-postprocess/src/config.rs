//! Export session configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! base_path = "renders/pendulum"
//! picture_width = 1280
//! picture_height = 720
//!
//! [camera]
//! location = [0.0, 2.0, -4.0]
//! aim = [0.0, 0.5, 0.0]
//!
//! [contacts]
//! show = true
//! symbol = "sphere_scale_radius"
//! ```

use std::path::{Path, PathBuf};

use orrery_math::{Color, Vec3};
use orrery_types::constants::{
    DEFAULT_CAMERA_ANGLE, DEFAULT_COG_SIZE, DEFAULT_DATA_BASE, DEFAULT_FINAL_FRAME, DEFAULT_FRAME_SIZE,
    DEFAULT_LINK_SIZE, DEFAULT_OUTPUT_DIR, DEFAULT_PICTURE_BASE, DEFAULT_PICTURE_DIR, DEFAULT_PICTURE_HEIGHT,
    DEFAULT_PICTURE_WIDTH, DEFAULT_SCRIPT_FILE, DEFAULT_WIREFRAME_THICKNESS, EPSILON, FRAME_NUMBER_WIDTH,
};
use orrery_types::{OrreryError, OrreryResult};
use serde::{Deserialize, Serialize};

/// Antialiasing settings written to the `.ini` file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Antialiasing {
    pub enabled: bool,
    pub depth: u32,
    pub threshold: f32,
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: 2,
            threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSetup {
    pub location: Vec3,
    pub aim: Vec3,
    /// Horizontal field of view (degrees).
    pub angle: f32,
    pub orthographic: bool,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            location: Vec3::new(0.0, 1.5, -2.0),
            aim: Vec3::ZERO,
            angle: DEFAULT_CAMERA_ANGLE,
            orthographic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSetup {
    pub location: Vec3,
    pub color: Color,
    pub cast_shadow: bool,
}

impl Default for LightSetup {
    fn default() -> Self {
        Self {
            location: Vec3::new(2.0, 10.0, -2.0),
            color: Color::WHITE,
            cast_shadow: true,
        }
    }
}

/// On/off toggle plus symbol size (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub show: bool,
    pub size: f32,
}

impl Overlay {
    pub const fn hidden(size: f32) -> Self {
        Self { show: false, size }
    }
}

/// How a contact is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactSymbol {
    /// Arrow along the normal, length proportional to the force.
    #[default]
    VectorScaleLength,
    /// Arrow of length `max_size`, radius proportional to the force.
    VectorScaleRadius,
    /// Arrow of length `max_size` and radius `width`.
    VectorNoScale,
    /// Sphere, radius proportional to the force.
    SphereScaleRadius,
    /// Sphere of radius `width`.
    SphereNoScale,
}

impl ContactSymbol {
    pub fn is_vector(self) -> bool {
        matches!(
            self,
            ContactSymbol::VectorScaleLength | ContactSymbol::VectorScaleRadius | ContactSymbol::VectorNoScale
        )
    }
}

/// Contact symbol settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDisplay {
    pub show: bool,
    pub symbol: ContactSymbol,
    /// Meters per newton for force-scaled dimensions.
    pub scale: f32,
    /// Arrow radius, or sphere radius in `SphereNoScale` mode.
    pub width: f32,
    /// Upper bound on scaled dimensions. Clamped symbols are drawn white.
    pub max_size: f32,
    /// Color by normal force between `colormap_start` and `colormap_end`.
    pub colormap: bool,
    pub colormap_start: f32,
    pub colormap_end: f32,
}

impl Default for ContactDisplay {
    fn default() -> Self {
        Self {
            show: false,
            symbol: ContactSymbol::default(),
            scale: 1.0,
            width: 0.001,
            max_size: 0.1,
            colormap: true,
            colormap_start: 0.0,
            colormap_end: 100.0,
        }
    }
}

/// Complete settings of an export session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory all other paths are relative to.
    pub base_path: PathBuf,
    /// Script file name; the `.ini` and `.assets` names derive from it.
    pub script_file: String,
    /// Sub-directory for rendered pictures.
    pub picture_dir: String,
    pub picture_base: String,
    /// Sub-directory for per-frame data files.
    pub output_dir: String,
    pub data_base: String,

    pub picture_width: u32,
    pub picture_height: u32,
    pub antialias: Antialiasing,
    /// Last frame index written to the `.ini` file.
    pub final_frame: u32,

    pub camera: CameraSetup,
    pub light: LightSetup,
    pub background: Color,
    pub ambient_light: Color,

    pub cogs: Overlay,
    pub frames: Overlay,
    pub links: Overlay,
    pub contacts: ContactDisplay,
    /// Tube radius for wireframe meshes.
    pub wireframe_thickness: f32,

    /// Appended to the script just before the data include.
    pub custom_script: String,
    /// Appended to every data file.
    pub custom_data: String,

    /// Collect all asset declarations in `<script>.assets`.
    pub single_asset_file: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            script_file: DEFAULT_SCRIPT_FILE.to_string(),
            picture_dir: DEFAULT_PICTURE_DIR.to_string(),
            picture_base: DEFAULT_PICTURE_BASE.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            data_base: DEFAULT_DATA_BASE.to_string(),
            picture_width: DEFAULT_PICTURE_WIDTH,
            picture_height: DEFAULT_PICTURE_HEIGHT,
            antialias: Antialiasing::default(),
            final_frame: DEFAULT_FINAL_FRAME,
            camera: CameraSetup::default(),
            light: LightSetup::default(),
            background: Color::new(1.0, 1.0, 1.0),
            ambient_light: Color::splat(2.0),
            cogs: Overlay::hidden(DEFAULT_COG_SIZE),
            frames: Overlay::hidden(DEFAULT_FRAME_SIZE),
            links: Overlay::hidden(DEFAULT_LINK_SIZE),
            contacts: ContactDisplay::default(),
            wireframe_thickness: DEFAULT_WIREFRAME_THICKNESS,
            custom_script: String::new(),
            custom_data: String::new(),
            single_asset_file: true,
        }
    }
}

impl ExportConfig {
    /// Small pictures, no antialiasing.
    pub fn preview() -> Self {
        Self {
            picture_width: 320,
            picture_height: 240,
            antialias: Antialiasing {
                enabled: false,
                ..Antialiasing::default()
            },
            ..Self::default()
        }
    }

    /// Full HD, deep antialiasing.
    pub fn high_quality() -> Self {
        Self {
            picture_width: 1920,
            picture_height: 1080,
            antialias: Antialiasing {
                enabled: true,
                depth: 3,
                threshold: 0.05,
            },
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> OrreryResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| OrreryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: &Path) -> OrreryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> OrreryResult<String> {
        toml::to_string_pretty(self).map_err(|e| OrreryError::Serialization(e.to_string()))
    }

    /// Checks value ranges and required names.
    pub fn validate(&self) -> OrreryResult<()> {
        let invalid = |msg: String| Err(OrreryError::InvalidConfig(msg));

        if self.picture_width == 0 || self.picture_height == 0 {
            return invalid(format!(
                "picture size must be positive, got {}x{}",
                self.picture_width, self.picture_height
            ));
        }
        for (name, value) in [
            ("script_file", &self.script_file),
            ("picture_base", &self.picture_base),
            ("data_base", &self.data_base),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("{} must not be empty", name));
            }
        }
        if self.antialias.threshold < 0.0 {
            return invalid(format!(
                "antialias threshold must be non-negative, got {}",
                self.antialias.threshold
            ));
        }
        for (name, value) in [
            ("cogs.size", self.cogs.size),
            ("frames.size", self.frames.size),
            ("links.size", self.links.size),
            ("contacts.scale", self.contacts.scale),
            ("contacts.width", self.contacts.width),
            ("contacts.max_size", self.contacts.max_size),
            ("wireframe_thickness", self.wireframe_thickness),
        ] {
            if value < 0.0 || !value.is_finite() {
                return invalid(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.camera.location.distance(self.camera.aim) < EPSILON {
            return invalid("camera location and aim coincide".to_string());
        }
        if self.camera.angle <= 0.0 || self.camera.angle >= 180.0 {
            return invalid(format!("camera angle must be in (0, 180), got {}", self.camera.angle));
        }
        Ok(())
    }

    // ─── Derived paths ────────────────────────────────────────

    pub fn script_path(&self) -> PathBuf {
        self.base_path.join(&self.script_file)
    }

    pub fn ini_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.ini", self.script_file))
    }

    pub fn assets_path(&self) -> PathBuf {
        self.base_path.join(self.assets_file_name())
    }

    pub fn assets_file_name(&self) -> String {
        format!("{}.assets", self.script_file)
    }

    pub fn picture_dir_path(&self) -> PathBuf {
        self.base_path.join(&self.picture_dir)
    }

    pub fn output_dir_path(&self) -> PathBuf {
        self.base_path.join(&self.output_dir)
    }

    /// `<data_base>NNNN.pov` (four digits, wider numbers printed in full).
    pub fn data_file_name(&self, frame: u32) -> String {
        format!("{}{:0width$}.pov", self.data_base, frame, width = FRAME_NUMBER_WIDTH)
    }

    pub fn data_path(&self, frame: u32) -> PathBuf {
        self.output_dir_path().join(self.data_file_name(frame))
    }
}
