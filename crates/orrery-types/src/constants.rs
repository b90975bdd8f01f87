//! Export layout defaults and overlay sizes.

/// Default script file name (the `.ini` and `.assets` files derive from it).
pub const DEFAULT_SCRIPT_FILE: &str = "render_frames.pov";

/// Default base name of pictures written by the offline renderer.
pub const DEFAULT_PICTURE_BASE: &str = "pic";

/// Default base name of per-frame data files.
pub const DEFAULT_DATA_BASE: &str = "state";

/// Default sub-directory (under the base path) for per-frame data files.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default sub-directory (under the base path) for rendered pictures.
pub const DEFAULT_PICTURE_DIR: &str = "anim";

/// Zero padding width of frame numbers in file names.
pub const FRAME_NUMBER_WIDTH: usize = 4;

/// Default picture size (pixels).
pub const DEFAULT_PICTURE_WIDTH: u32 = 640;
pub const DEFAULT_PICTURE_HEIGHT: u32 = 480;

/// Default last frame index written into the renderer `.ini` file.
pub const DEFAULT_FINAL_FRAME: u32 = 999;

/// Default symbol sizes (meters).
pub const DEFAULT_COG_SIZE: f32 = 0.04;
pub const DEFAULT_FRAME_SIZE: f32 = 0.05;
pub const DEFAULT_LINK_SIZE: f32 = 0.04;

/// Default tube radius for wireframe meshes (meters).
pub const DEFAULT_WIREFRAME_THICKNESS: f32 = 0.01;

/// Default camera field of view (degrees).
pub const DEFAULT_CAMERA_ANGLE: f32 = 30.0;

/// Default headless framebuffer size (pixels).
pub const DEFAULT_FRAMEBUFFER_WIDTH: u32 = 320;
pub const DEFAULT_FRAMEBUFFER_HEIGHT: u32 = 240;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;
