//! optray CLI - batch optical ray-path tracing
//!
//! Reads a JSON scene description, traces every ray it lists through
//! the recursive reflect/refract tracer, and writes the resulting
//! polylines with their terminal reasons as JSON.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

use optray_trace::Tracer;

mod doc;

use doc::{PathDoc, SceneDoc};

#[derive(Parser)]
#[command(name = "optray")]
#[command(about = "Trace optical ray paths through analytic scenes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace the rays of a scene file and write the traced paths
    Trace {
        /// Input scene file (.json)
        scene: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Display information about a scene file
    Info {
        /// Path to the scene file
        scene: PathBuf,
    },
    /// Print a starter scene template
    Template,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Trace {
            scene,
            output,
            pretty,
        } => trace_scene(&scene, output.as_deref(), pretty),
        Commands::Info { scene } => show_info(&scene),
        Commands::Template => {
            println!("{}", doc::template().to_json()?);
            Ok(())
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn load(path: &std::path::Path) -> Result<SceneDoc> {
    let json = fs::read_to_string(path)?;
    SceneDoc::from_json(&json)
}

fn trace_scene(scene_path: &std::path::Path, output: Option<&std::path::Path>, pretty: bool) -> Result<()> {
    let doc = load(scene_path)?;
    if doc.rays.is_empty() {
        bail!("scene file lists no rays to trace");
    }

    let (scene, config) = doc.build()?;
    let rays = doc.build_rays()?;

    let tracer = Tracer::new(&scene, config)?;
    log::info!(
        "tracing {} rays against {} surfaces (max depth {})",
        rays.len(),
        scene.len(),
        tracer.config().max_depth
    );

    let paths = tracer.trace_all(&rays);
    let docs: Vec<PathDoc> = paths.iter().map(PathDoc::from_path).collect();

    let json = if pretty {
        serde_json::to_string_pretty(&docs)?
    } else {
        serde_json::to_string(&docs)?
    };

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote {} paths to {}", docs.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn show_info(scene_path: &std::path::Path) -> Result<()> {
    let doc = load(scene_path)?;
    let (scene, config) = doc.build()?;

    println!("Scene: {}", scene_path.display());
    println!("  surfaces:      {}", scene.len());
    println!("  rays:          {}", doc.rays.len());
    println!("  max depth:     {}", config.max_depth);
    println!("  ambient index: {}", config.ambient_index);

    // Fail-fast checks a trace run would apply, minus the ray list.
    if scene.is_empty() {
        println!("  note: scene has no surfaces; tracing would be rejected");
    } else {
        let _ = Tracer::new(&scene, config)?;
    }

    Ok(())
}
