//! Tray Exporter CLI
//!
//! Export scene descriptions to the tray_rust renderer's scene format.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tray_exporter::{ExportConfig, Exporter, HostScene, MemoryScene, ObjWriter};

#[derive(Parser)]
#[command(name = "tray-export")]
#[command(author, version, about = "Export scenes to the tray_rust renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene description to a renderer document and OBJ geometry file
    Export {
        /// Input scene description (JSON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Output document path; the geometry file is written next to it
        #[arg(short, long)]
        output: PathBuf,

        /// Exporter configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Integrator type (e.g., "pathtracer", "normals_debug")
        #[arg(long)]
        integrator: Option<String>,

        /// Samples per pixel, overriding the scene's render settings
        #[arg(long)]
        samples: Option<u32>,
    },

    /// Show information about a scene description
    Info {
        /// Input scene description (JSON)
        #[arg(short, long)]
        scene: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            scene,
            output,
            config,
            integrator,
            samples,
        } => {
            export(&scene, &output, config, integrator, samples)?;
        }
        Commands::Info { scene } => {
            show_scene_info(&scene)?;
        }
    }

    Ok(())
}

fn export(
    scene_path: &PathBuf,
    output_path: &PathBuf,
    config_path: Option<PathBuf>,
    integrator: Option<String>,
    samples: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let mut scene = MemoryScene::load(scene_path)?;
    println!("  Loaded {} nodes", scene.node_count());

    let mut config = match config_path {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    if let Some(kind) = &integrator {
        config = config.with_integrator(kind);
    }
    if let Some(samples) = samples {
        config = config.with_samples(samples);
    }

    println!("Exporting with config:");
    println!("  - Integrator: {}", config.integrator.kind);
    println!("  - Default material: {}", config.default_material.name);
    if let Some(samples) = config.samples {
        println!("  - Samples: {}", samples);
    }

    let mut writer = ObjWriter::new();
    let report = Exporter::with_config(config).export(&mut scene, &mut writer, output_path)?;

    println!(
        "  {} objects, {} cameras, {} materials",
        report.document.objects.len(),
        report.document.cameras.len(),
        report.document.materials.len()
    );
    println!("Exported scene to {:?}", output_path);
    println!(
        "  Geometry: {:?} ({} meshes)",
        report.geometry_path, report.exported_meshes
    );
    if report.is_degraded() {
        println!("Completed with {} warnings:", report.warnings.len());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn show_scene_info(scene_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading scene from {:?}...", scene_path);
    let scene = MemoryScene::load(scene_path)?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut animated = 0;
    for id in scene.nodes() {
        *counts.entry(scene.kind(id).label()).or_default() += 1;
        if scene.animation_range(id).is_some() {
            animated += 1;
        }
    }
    let has_camera = scene
        .nodes()
        .into_iter()
        .any(|id| scene.kind(id).is_camera());

    let settings = scene.render_settings();
    println!("\nScene Info:");
    println!("  Nodes: {}", scene.node_count());
    for (kind, count) in &counts {
        println!("    {}: {}", kind, count);
    }
    println!("  Animated nodes: {}", animated);
    println!("  Markers: {}", scene.markers().len());
    println!(
        "  Frames: {}-{} at {} fps",
        settings.frame_start, settings.frame_end, settings.frame_rate
    );
    println!("  Resolution: {}x{}", settings.width, settings.height);
    if !has_camera {
        println!("  Warning: no camera, export will fail");
    }

    Ok(())
}
