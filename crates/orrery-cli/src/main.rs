//! Orrery CLI: demo scenes, offline POV-Ray export and headless preview.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod scenes;

use commands::{ExportOptions, Quality};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(version, about = "Orrery: visualization and offline export for multibody simulations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a demo scene and export a POV-Ray script plus one data file per step.
    Export {
        /// Scene name (see `orrery scenes`).
        #[arg(short, long, default_value = "pendulum")]
        scene: String,

        /// Export config (TOML). Overrides --quality and the scene camera.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preset used when no config file is given.
        #[arg(short, long, value_enum, default_value_t = Quality::Default)]
        quality: Quality,

        /// Base directory for the script and its sub-directories.
        #[arg(short, long, default_value = "render")]
        out: PathBuf,

        /// Number of steps (one data file each).
        #[arg(short, long, default_value_t = 100)]
        frames: u32,

        /// Step size in seconds.
        #[arg(long, default_value_t = 0.01)]
        dt: f32,

        /// Also write telemetry events as JSON lines.
        #[arg(long)]
        telemetry: Option<PathBuf>,
    },

    /// Render a demo scene with the headless backend.
    Preview {
        #[arg(short, long, default_value = "pendulum")]
        scene: String,

        #[arg(short, long, default_value_t = 60)]
        frames: u64,

        #[arg(long, default_value_t = 0.01)]
        dt: f32,

        #[arg(long, default_value_t = 640)]
        width: u32,

        #[arg(long, default_value_t = 480)]
        height: u32,

        /// Save the last frame (PNG, BMP or JPEG by extension).
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Validate an export config (.toml) or a triangle mesh (.json).
    Validate {
        path: PathBuf,
    },

    /// List the built-in demo scenes.
    Scenes,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            scene,
            config,
            quality,
            out,
            frames,
            dt,
            telemetry,
        } => commands::export(&ExportOptions {
            scene: &scene,
            config: config.as_deref(),
            quality,
            out: &out,
            frames,
            dt,
            telemetry: telemetry.as_deref(),
        }),
        Commands::Preview {
            scene,
            frames,
            dt,
            width,
            height,
            image,
        } => commands::preview(&scene, frames, dt, (width, height), image.as_deref()),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Scenes => commands::list_scenes(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
