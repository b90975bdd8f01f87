//! CLI command implementations.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use orrery_assets::TriangleMesh;
use orrery_math::Frame;
use orrery_physics::SharedSystem;
use orrery_postprocess::{ExportConfig, PovExporter};
use orrery_telemetry::{EventBus, EventKind, JsonLinesSink, TelemetryEvent, TelemetryListener, TracingSink};
use orrery_visual::{attach, HeadlessVisualSystem, VisualSystem};

use crate::scenes;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Export quality preset used when no config file is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Quality {
    Default,
    Preview,
    High,
}

/// Options of the `export` command.
pub struct ExportOptions<'a> {
    pub scene: &'a str,
    pub config: Option<&'a Path>,
    pub quality: Quality,
    pub out: &'a Path,
    pub frames: u32,
    pub dt: f32,
    pub telemetry: Option<&'a Path>,
}

fn load_scene(name: &str) -> Result<scenes::DemoScene, Box<dyn std::error::Error>> {
    scenes::build(name).ok_or_else(|| {
        format!(
            "Unknown scene: '{name}'. Available: {}",
            scenes::names().join(", ")
        )
        .into()
    })
}

/// Tracing sink plus an optional JSON-lines file, registered on `system`.
fn telemetry_listener(
    system: &SharedSystem,
    json_path: Option<&Path>,
) -> Result<Rc<RefCell<TelemetryListener>>, Box<dyn std::error::Error>> {
    let mut bus = EventBus::new().with_sink(TracingSink::new());
    if let Some(path) = json_path {
        bus.add_sink(Box::new(JsonLinesSink::new(BufWriter::new(File::create(path)?))));
    }
    let listener = Rc::new(RefCell::new(TelemetryListener::new(bus)));
    system.borrow_mut().add_listener(&listener);
    Ok(listener)
}

fn emit(listener: &Rc<RefCell<TelemetryListener>>, system: &SharedSystem, kind: EventKind) {
    let step = system.borrow().step_count();
    let mut listener = listener.borrow_mut();
    listener.bus().emit(TelemetryEvent::new(step, kind));
    listener.bus_mut().flush();
}

/// Build a demo scene and export it frame by frame.
pub fn export(opts: &ExportOptions<'_>) -> CliResult {
    println!("Orrery Export");
    println!("═════════════");
    println!();

    let scene = load_scene(opts.scene)?;
    let mut config = match opts.config {
        Some(path) => ExportConfig::load(path)?,
        None => {
            let mut config = match opts.quality {
                Quality::Default => ExportConfig::default(),
                Quality::Preview => ExportConfig::preview(),
                Quality::High => ExportConfig::high_quality(),
            };
            config.camera.location = scene.camera_position;
            config.camera.aim = scene.camera_target;
            config
        }
    };
    config.base_path = opts.out.to_path_buf();
    std::fs::create_dir_all(config.output_dir_path())?;
    std::fs::create_dir_all(config.picture_dir_path())?;

    let system = scene.system;
    let telemetry = telemetry_listener(&system, opts.telemetry)?;

    let mut exporter = PovExporter::new(&system).with_config(config);
    let items = exporter.add_all();

    println!("Scene:   {}", opts.scene);
    println!("Items:   {items}");
    println!("Frames:  {} (dt = {}s)", opts.frames, opts.dt);
    println!("Output:  {}", opts.out.display());
    println!();

    let script = exporter.export_script()?;
    emit(&telemetry, &system, EventKind::ScriptExported { path: script.clone() });

    for _ in 0..opts.frames {
        system.borrow_mut().do_step(opts.dt);
        let frame = exporter.frame_number();
        let path = exporter.export_data()?;
        emit(
            &telemetry,
            &system,
            EventKind::DataExported {
                frame,
                path,
                items: exporter.items().len(),
            },
        );
    }
    telemetry.borrow_mut().bus_mut().finalize();

    println!("Script:     {}", script.display());
    println!("Shapes:     {}", exporter.shape_registry().len());
    println!("Materials:  {}", exporter.material_registry().len());
    println!("Data files: {}", opts.frames);
    println!();
    println!("Render with: povray {}", exporter.config().ini_path().display());
    Ok(())
}

/// Drive the headless backend through the frame loop.
pub fn preview(
    scene_name: &str,
    frames: u64,
    dt: f32,
    resolution: (u32, u32),
    image: Option<&Path>,
) -> CliResult {
    println!("Orrery Headless Preview");
    println!("═══════════════════════");
    println!();

    let scene = load_scene(scene_name)?;
    let system = scene.system;
    let telemetry = telemetry_listener(&system, None)?;

    let visual = Rc::new(RefCell::new(
        HeadlessVisualSystem::new()
            .with_resolution(resolution.0, resolution.1)
            .with_frame_limit(frames),
    ));
    attach(&visual, &system);
    {
        let mut vis = visual.borrow_mut();
        vis.bind_all();
        vis.add_camera(scene.camera_position, scene.camera_target);
    }

    loop {
        let running = visual.borrow_mut().run();
        if !running {
            break;
        }
        system.borrow_mut().do_step(dt);

        let (frame, bindings) = {
            let mut vis = visual.borrow_mut();
            vis.begin_scene();
            vis.render();
            vis.render_grid(&Frame::IDENTITY, 10, 0.2);
            vis.render_cog_frames(0.1);
            vis.end_scene();
            (vis.lifecycle().frames_completed().saturating_sub(1), vis.binding_count())
        };
        emit(&telemetry, &system, EventKind::FrameRendered { frame, bindings });
    }
    telemetry.borrow_mut().bus_mut().finalize();

    let vis = visual.borrow();
    println!("Scene:     {scene_name}");
    println!("Frames:    {}", vis.lifecycle().frames_completed());
    println!("Bindings:  {}", vis.binding_count());
    println!("Drawn:     {} instances", vis.drawn_instances());
    println!("Sim time:  {:.3}s", vis.simulation_time());
    println!("RTF:       {:.3}", vis.simulation_rtf());
    drop(vis);

    if let Some(path) = image {
        visual.borrow_mut().write_image_to_file(path)?;
        println!("Image:     {}", path.display());
    }
    Ok(())
}

/// Validate an export config (`.toml`) or a triangle mesh (`.json`).
pub fn validate(path: &Path) -> CliResult {
    println!("Orrery Validate");
    println!("───────────────");
    println!("Input: {}", path.display());
    println!();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let config = ExportConfig::load(path)?;
            println!("✓ Export config is valid");
            println!("  Picture:   {}x{}", config.picture_width, config.picture_height);
            println!("  Script:    {}", config.script_file);
            println!("  Data:      {}/{}", config.output_dir, config.data_file_name(0));
            println!("  Assets:    {}", if config.single_asset_file { "single file" } else { "per data file" });
        }
        Some("json") => {
            let text = std::fs::read_to_string(path)?;
            let mesh: TriangleMesh = serde_json::from_str(&text)?;
            mesh.validate()?;
            println!("✓ Mesh is valid");
            println!("  Vertices:  {}", mesh.vertex_count());
            println!("  Triangles: {}", mesh.triangle_count());
            if let Some((min, max)) = mesh.bounds() {
                println!("  Bounds:    {min} .. {max}");
            }
        }
        _ => return Err("Unsupported input: expected a .toml export config or a .json mesh".into()),
    }
    Ok(())
}

/// List the built-in scenes.
pub fn list_scenes() -> CliResult {
    println!("Available scenes:");
    for (name, description) in scenes::SCENES {
        println!("  {name:<18} {description}");
    }
    Ok(())
}
