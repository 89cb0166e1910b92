mod aabb;
mod base;
mod bvh;
mod camera;
mod color;
mod error;
mod hit;
mod integrator;
mod material;
mod mesh;
mod point;
mod ppm;
mod progress;
mod ray;
mod resources;
mod scene;
mod shape;
mod texture;
mod vector;

use crate::error::RtError;
use crate::integrator::RenderSettings;
use crate::scene::demos;

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "bvh-tracer", about = "Offline Monte-Carlo path tracer over a BVH")]
struct Cli {
    /// Which built-in demo scene to render (0-5)
    #[arg(default_value_t = 0)]
    demo: usize,

    /// Output PPM (P3) file path
    #[arg(short, long, default_value = "out.ppm")]
    output: PathBuf,

    /// Worker thread count
    #[arg(short = 't', long, default_value_t = 4)]
    threads: u32,

    /// Override the scene's default sample count
    #[arg(short, long)]
    samples: Option<u32>,

    /// Override the scene's default max recursion depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Master RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn run() -> Result<(), RtError> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let mut scene = demos::build(cli.demo)?;
    if let Some(samples) = cli.samples {
        scene.samples_per_pixel = samples;
    }
    if let Some(depth) = cli.depth {
        scene.max_depth = depth;
    }

    let settings = RenderSettings {
        image_width: scene.image_width,
        image_height: scene.image_height,
        samples_per_pixel: scene.samples_per_pixel,
        max_depth: scene.max_depth,
        background: scene.background,
        thread_count: cli.threads.max(1),
    };

    let world: Arc<hit::SyncHittable> = Arc::new(scene.world);
    let camera = Arc::new(scene.camera);

    let pixels = integrator::render(world, camera, &settings, cli.seed);
    ppm::write_ppm_file(&cli.output, &pixels, settings.image_width, settings.image_height, settings.samples_per_pixel)?;

    log::info!(
        "wrote {:?} ({}x{}, {} spp) in {:.2}s",
        cli.output,
        settings.image_width,
        settings.image_height,
        settings.samples_per_pixel,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
