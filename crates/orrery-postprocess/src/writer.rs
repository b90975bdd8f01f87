//! POV-Ray text emission.
//!
//! Pure functions from configuration and assets to script text. Floats
//! are printed with `{}` (shortest round-trip form), so identical inputs
//! give byte-identical output.

use orrery_assets::{Geometry, Topology, TriangleMesh, VisualMaterial, VisualShape};
use orrery_math::{Color, Frame, Vec3};
use orrery_physics::Contact;

use crate::config::{ContactDisplay, ContactSymbol, ExportConfig};

const CONTACT_COLOR: Color = Color::new(1.0, 0.6, 0.0);
const MIN_ROUGHNESS: f32 = 0.0005;

/// Line-oriented text buffer.
#[derive(Debug, Default)]
pub(crate) struct PovWriter {
    buf: String,
}

impl PovWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends `text` verbatim, adding a final newline if missing.
    pub fn raw(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buf.push_str(text);
        if !text.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

pub(crate) fn vec3(v: Vec3) -> String {
    format!("<{}, {}, {}>", v.x, v.y, v.z)
}

pub(crate) fn rgb(c: Color) -> String {
    format!("rgb <{}, {}, {}>", c.r, c.g, c.b)
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "On"
    } else {
        "Off"
    }
}

/// Folds line breaks so text stays inside a `//` comment.
pub(crate) fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

pub(crate) fn shape_name(id: u32) -> String {
    format!("shape_{}", id)
}

pub(crate) fn material_name(id: u32) -> String {
    format!("mat_{}", id)
}

// ─── .ini ─────────────────────────────────────────────────────

pub(crate) fn ini(cfg: &ExportConfig) -> String {
    let mut w = PovWriter::new();
    w.line("; POV-Ray render settings written by orrery");
    w.line(&format!("Antialias={}", on_off(cfg.antialias.enabled)));
    w.line(&format!("Antialias_Depth={}", cfg.antialias.depth));
    w.line(&format!("Antialias_Threshold={}", cfg.antialias.threshold));
    w.line(&format!("Width={}", cfg.picture_width));
    w.line(&format!("Height={}", cfg.picture_height));
    w.line(&format!("Input_File_Name=\"{}\"", cfg.script_file));
    w.line(&format!(
        "Output_File_Name=\"{}\"",
        join_rel(&cfg.picture_dir, &cfg.picture_base)
    ));
    w.line("Initial_Frame=0000");
    w.line(&format!("Final_Frame={:04}", cfg.final_frame));
    w.line("Initial_Clock=0");
    w.line("Final_Clock=1");
    w.line("Pause_when_Done=off");
    w.finish()
}

/// `dir/name` with forward slashes, or `name` when `dir` is empty.
fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

// ─── Script ───────────────────────────────────────────────────

pub(crate) fn script(cfg: &ExportConfig) -> String {
    let mut w = PovWriter::new();
    w.line("// Scene script written by orrery.");
    w.line(&format!("// Render with: povray {}.ini", cfg.script_file));
    w.blank();
    w.line("#include \"colors.inc\"");
    w.line("#include \"textures.inc\"");
    w.line("#include \"transforms.inc\"");
    w.blank();

    w.line(&format!("global_settings {{ ambient_light {} }}", rgb(cfg.ambient_light)));
    w.line(&format!("background {{ {} }}", rgb(cfg.background)));
    w.blank();

    w.line("camera {");
    w.line(if cfg.camera.orthographic {
        "  orthographic"
    } else {
        "  perspective"
    });
    w.line(&format!("  location {}", vec3(cfg.camera.location)));
    w.line(&format!("  look_at {}", vec3(cfg.camera.aim)));
    w.line(&format!("  angle {}", cfg.camera.angle));
    w.line("}");
    w.blank();

    w.line(&format!(
        "light_source {{ {} color {}{} }}",
        vec3(cfg.light.location),
        rgb(cfg.light.color),
        if cfg.light.cast_shadow { "" } else { " shadowless" }
    ));
    w.blank();

    overlay_macros(&mut w, cfg);

    w.line("#declare mat_default = texture {");
    w.line("  pigment { color rgb <0.8, 0.8, 0.8> }");
    w.line("  finish { diffuse 0.8 specular 0.1 }");
    w.line("}");
    w.blank();

    if cfg.single_asset_file {
        w.line(&format!("#include \"{}\"", cfg.assets_file_name()));
        w.blank();
    }

    if !cfg.custom_script.is_empty() {
        w.line("// Custom commands");
        w.raw(&cfg.custom_script);
        w.blank();
    }

    w.line("// Per-frame data, selected by the animation frame number");
    w.line(&format!(
        "#declare data_file = concat(\"{}\", str(frame_number, -4, 0), \".pov\")",
        join_rel(&cfg.output_dir, &cfg.data_base)
    ));
    w.line("#include data_file");
    w.finish()
}

fn overlay_macros(w: &mut PovWriter, cfg: &ExportConfig) {
    w.line("#macro sh_cog(apos, asize)");
    w.line("sphere { apos, asize * 0.5");
    w.line("  pigment { checker color rgb <1, 1, 0> color rgb <0, 0, 0> scale asize * 0.25 }");
    w.line("  no_shadow");
    w.line("}");
    w.line("#end");
    w.blank();

    w.line("#macro sh_frame(apos, ax, ay, az, asize)");
    w.line("union {");
    w.line("  cylinder { apos, apos + ax * asize, asize * 0.05 pigment { color rgb <1, 0, 0> } }");
    w.line("  cylinder { apos, apos + ay * asize, asize * 0.05 pigment { color rgb <0, 1, 0> } }");
    w.line("  cylinder { apos, apos + az * asize, asize * 0.05 pigment { color rgb <0, 0, 1> } }");
    w.line("  no_shadow");
    w.line("}");
    w.line("#end");
    w.blank();

    w.line("#macro sh_link(apos, ax, ay, az, asize)");
    w.line("union {");
    w.line("  sh_frame(apos, ax, ay, az, asize)");
    w.line("  sphere { apos, asize * 0.1 pigment { color rgb <0.6, 0.6, 0.6> } }");
    w.line("  no_shadow");
    w.line("}");
    w.line("#end");
    w.blank();

    w.line("#macro sh_contact(apos, adir, alength, aradius, acolor)");
    if cfg.contacts.symbol.is_vector() {
        w.line("cylinder { apos, apos + adir * alength, aradius pigment { color acolor } no_shadow }");
    } else {
        w.line("sphere { apos, aradius pigment { color acolor } no_shadow }");
    }
    w.line("#end");
    w.blank();
}

// ─── Declarations ─────────────────────────────────────────────

pub(crate) fn declare_shape(w: &mut PovWriter, id: u32, shape: &VisualShape, wireframe_thickness: f32) {
    let name = shape_name(id);
    match shape.geometry() {
        Geometry::Sphere { radius } => {
            w.line(&format!("#declare {} = sphere {{ <0, 0, 0>, {} }}", name, radius));
        }
        Geometry::Ellipsoid { semi_axes } => {
            w.line(&format!(
                "#declare {} = sphere {{ <0, 0, 0>, 1 scale {} }}",
                name,
                vec3(*semi_axes)
            ));
        }
        Geometry::Box { half_lengths } => {
            w.line(&format!(
                "#declare {} = box {{ {}, {} }}",
                name,
                vec3(-*half_lengths),
                vec3(*half_lengths)
            ));
        }
        Geometry::Cylinder { radius, height } => {
            let h = height * 0.5;
            w.line(&format!(
                "#declare {} = cylinder {{ <0, {}, 0>, <0, {}, 0>, {} }}",
                name, -h, h, radius
            ));
        }
        Geometry::Capsule { radius, height } => {
            let h = height * 0.5;
            w.line(&format!("#declare {} = merge {{", name));
            w.line(&format!("  cylinder {{ <0, {}, 0>, <0, {}, 0>, {} }}", -h, h, radius));
            w.line(&format!("  sphere {{ <0, {}, 0>, {} }}", -h, radius));
            w.line(&format!("  sphere {{ <0, {}, 0>, {} }}", h, radius));
            w.line("}");
        }
        Geometry::Mesh(mesh) if mesh.triangle_count() == 0 => {
            w.line("// empty mesh");
            w.line(&format!("#declare {} = sphere {{ <0, 0, 0>, 0 }}", name));
        }
        Geometry::Mesh(mesh) if shape.is_wireframe() => {
            declare_wireframe(w, &name, mesh, wireframe_thickness);
        }
        Geometry::Mesh(mesh) => declare_mesh2(w, &name, mesh),
    }
}

fn declare_mesh2(w: &mut PovWriter, name: &str, mesh: &TriangleMesh) {
    let n = mesh.vertex_count();
    w.line(&format!("#declare {} = mesh2 {{", name));

    w.line(&format!("  vertex_vectors {{ {},", n));
    let verts: Vec<String> = (0..n).map(|i| format!("    {}", vec3(mesh.position(i)))).collect();
    w.line(&verts.join(",\n"));
    w.line("  }");

    if mesh.normal_x.len() == n {
        w.line(&format!("  normal_vectors {{ {},", n));
        let normals: Vec<String> = (0..n).map(|i| format!("    {}", vec3(mesh.normal(i)))).collect();
        w.line(&normals.join(",\n"));
        w.line("  }");
    }

    if mesh.has_uvs() {
        w.line(&format!("  uv_vectors {{ {},", n));
        let uvs: Vec<String> = (0..n)
            .map(|i| format!("    <{}, {}>", mesh.uv_u[i], mesh.uv_v[i]))
            .collect();
        w.line(&uvs.join(",\n"));
        w.line("  }");
    }

    let t = mesh.triangle_count();
    w.line(&format!("  face_indices {{ {},", t));
    let faces: Vec<String> = (0..t)
        .map(|i| {
            let [a, b, c] = mesh.triangle(i);
            format!("    <{}, {}, {}>", a, b, c)
        })
        .collect();
    w.line(&faces.join(",\n"));
    w.line("  }");
    w.line("}");
}

fn declare_wireframe(w: &mut PovWriter, name: &str, mesh: &TriangleMesh, thickness: f32) {
    let topology = Topology::build(mesh);
    w.line(&format!("#declare {} = union {{", name));
    for [a, b] in &topology.edges {
        let pa = mesh.position(*a as usize);
        let pb = mesh.position(*b as usize);
        if pa.distance_squared(pb) <= f32::EPSILON {
            continue;
        }
        w.line(&format!("  cylinder {{ {}, {}, {} }}", vec3(pa), vec3(pb), thickness));
    }
    for i in 0..mesh.vertex_count() {
        w.line(&format!("  sphere {{ {}, {} }}", vec3(mesh.position(i)), thickness));
    }
    w.line("}");
}

pub(crate) fn declare_material(w: &mut PovWriter, id: u32, mat: &VisualMaterial) {
    w.line(&format!("#declare {} = texture {{", material_name(id)));
    w.line(&format!("  // {}", single_line(&mat.name)));
    match &mat.texture {
        Some(path) => {
            let format = image_map_format(path);
            w.line(&format!(
                "  pigment {{ image_map {{ {} \"{}\" transmit all {} }} }}",
                format,
                path.display(),
                mat.transmit()
            ));
        }
        None => {
            let d = mat.diffuse;
            w.line(&format!(
                "  pigment {{ color rgbt <{}, {}, {}, {}> }}",
                d.r,
                d.g,
                d.b,
                mat.transmit()
            ));
        }
    }
    let s = mat.specular;
    let specular = (s.r + s.g + s.b) / 3.0;
    w.line(&format!(
        "  finish {{ diffuse 0.8 specular {} roughness {} }}",
        specular,
        mat.roughness.max(MIN_ROUGHNESS)
    ));
    w.line("}");
}

/// POV-Ray image_map keyword for a texture file; `sys` lets POV-Ray decide.
fn image_map_format(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "png",
        Some("jpg") | Some("jpeg") => "jpeg",
        Some("bmp") => "bmp",
        Some("tga") => "tga",
        Some("gif") => "gif",
        Some("ppm") => "ppm",
        Some("tif") | Some("tiff") => "tiff",
        Some("hdr") => "hdr",
        Some("exr") => "exr",
        _ => "sys",
    }
}

// ─── Placement ────────────────────────────────────────────────

/// `matrix <x-axis, y-axis, z-axis, translation>` for a rigid frame.
pub(crate) fn matrix(frame: &Frame) -> String {
    let r = frame.rotation_matrix();
    let (x, y, z, t) = (r.x_axis, r.y_axis, r.z_axis, frame.position);
    format!(
        "matrix <{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}>",
        x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z, t.x, t.y, t.z
    )
}

pub(crate) fn place_object(w: &mut PovWriter, shape_id: u32, material_id: Option<u32>, frame: &Frame) {
    let texture = material_id
        .map(material_name)
        .unwrap_or_else(|| "mat_default".to_string());
    w.line(&format!(
        "object {{ {} texture {{ {} }} {} }}",
        shape_name(shape_id),
        texture,
        matrix(frame)
    ));
}

pub(crate) fn cog_call(w: &mut PovWriter, frame: &Frame, size: f32) {
    w.line(&format!("sh_cog({}, {})", vec3(frame.position), size));
}

/// `sh_frame` or `sh_link` call for the axes of `frame`.
pub(crate) fn axes_call(w: &mut PovWriter, macro_name: &str, frame: &Frame, size: f32) {
    w.line(&format!(
        "{}({}, {}, {}, {}, {})",
        macro_name,
        vec3(frame.position),
        vec3(frame.axis_x()),
        vec3(frame.axis_y()),
        vec3(frame.axis_z()),
        size
    ));
}

/// Symbol length, radius and color for a contact, or `None` if degenerate.
pub(crate) fn contact_symbol(contact: &Contact, display: &ContactDisplay) -> Option<(f32, f32, Color)> {
    let force = contact.normal_force();
    let scaled = force * display.scale;
    let clamped = scaled > display.max_size;
    let scaled = scaled.min(display.max_size);

    let (length, radius, scaled_dim_clamped) = match display.symbol {
        ContactSymbol::VectorScaleLength => (scaled, display.width, clamped),
        ContactSymbol::VectorScaleRadius => (display.max_size, scaled, clamped),
        ContactSymbol::VectorNoScale => (display.max_size, display.width, false),
        ContactSymbol::SphereScaleRadius => (0.0, scaled, clamped),
        ContactSymbol::SphereNoScale => (0.0, display.width, false),
    };
    if radius <= 0.0 || (display.symbol.is_vector() && length <= 0.0) {
        return None;
    }

    let color = if scaled_dim_clamped {
        Color::WHITE
    } else if display.colormap {
        let span = display.colormap_end - display.colormap_start;
        let t = if span.abs() > f32::EPSILON {
            ((force - display.colormap_start) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        colormap(t)
    } else {
        CONTACT_COLOR
    };
    Some((length, radius, color))
}

/// Blue → green → red.
fn colormap(t: f32) -> Color {
    if t < 0.5 {
        Color::BLUE.lerp(Color::GREEN, t * 2.0)
    } else {
        Color::GREEN.lerp(Color::RED, (t - 0.5) * 2.0)
    }
}

pub(crate) fn contact_call(w: &mut PovWriter, contact: &Contact, display: &ContactDisplay) {
    let Some((length, radius, color)) = contact_symbol(contact, display) else {
        return;
    };
    let dir = contact.normal.try_normalize().unwrap_or(Vec3::Y);
    w.line(&format!(
        "sh_contact({}, {}, {}, {}, {})",
        vec3(contact.position),
        vec3(dir),
        length,
        radius,
        rgb(color)
    ));
}
