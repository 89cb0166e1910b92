use crate::camera::Camera;
use crate::color::RGB;
use crate::hit::{Hittable, SyncHittable};
use crate::progress::Progress;
use crate::ray::Ray;
use crate::vector::NEAR_ZERO;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::thread;

pub const TILE_SIZE: u32 = 16;

// Recursive shading evaluator, exactly the pseudocode this crate's design
// is built around: depth cutoff substitutes for Russian roulette, the
// background color is returned unchanged on a miss, and emission is added
// before recursing into the scattered ray.
pub fn ray_color(ray: &Ray, world: &SyncHittable, background: RGB, depth: u32, rng: &mut SmallRng) -> RGB {
    if depth == 0 {
        return RGB::black();
    }

    let rec = match world.hit(ray, NEAR_ZERO, f32::INFINITY) {
        Some(rec) => rec,
        None => return background,
    };

    let emitted = rec.material.emitted(&rec);
    let scattered = match rec.material.scatter(ray.dir, &rec, rng) {
        Some(s) => s,
        None => return emitted,
    };
    let (attenuation, scattered_ray) = scattered;

    emitted + attenuation * ray_color(&scattered_ray, world, background, depth - 1, rng)
}

pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: RGB,
    pub thread_count: u32,
}

struct Tile {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

// Tile-at-a-time work queue: a Mutex-guarded Vec that each worker pops
// from, in the same "shared mutable queue behind a lock" idiom the
// teacher's per-pixel mpsc queue used, just coarsened to tiles per spec.md
// §4.J's explicit tiling requirement.
fn build_tile_queue(width: u32, height: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut y0 = 0;
    while y0 < height {
        let y1 = (y0 + TILE_SIZE).min(height);
        let mut x0 = 0;
        while x0 < width {
            let x1 = (x0 + TILE_SIZE).min(width);
            tiles.push(Tile { x0, y0, x1, y1 });
            x0 = x1;
        }
        y0 = y1;
    }
    tiles
}

// Renders the full image, splitting work across `settings.thread_count`
// worker threads. The world, camera and settings are read-only and shared
// via `Arc`; each worker owns a distinct `SmallRng` stream seeded from
// `seed` so repeated single-thread runs are reproducible while parallel
// runs need not match bit-for-bit (spec.md §5).
pub fn render(world: Arc<SyncHittable>, camera: Arc<Camera>, settings: &RenderSettings, seed: u64) -> Vec<RGB> {
    let pixel_count = (settings.image_width * settings.image_height) as usize;
    let buffer = Arc::new(Mutex::new(vec![RGB::black(); pixel_count]));
    let queue = Arc::new(Mutex::new(build_tile_queue(settings.image_width, settings.image_height)));
    let total_tiles = queue.lock().unwrap().len();
    let progress = Arc::new(Progress::new(total_tiles as u64));

    let thread_count = settings.thread_count.max(1);
    let mut workers = Vec::with_capacity(thread_count as usize - 1);

    for worker_id in 1..thread_count {
        let world = Arc::clone(&world);
        let camera = Arc::clone(&camera);
        let buffer = Arc::clone(&buffer);
        let queue = Arc::clone(&queue);
        let progress = Arc::clone(&progress);
        let image_width = settings.image_width;
        let samples_per_pixel = settings.samples_per_pixel;
        let max_depth = settings.max_depth;
        let background = settings.background;
        workers.push(thread::spawn(move || {
            render_worker(
                worker_id as u64,
                seed,
                &world,
                &camera,
                &queue,
                &buffer,
                &progress,
                image_width,
                samples_per_pixel,
                max_depth,
                background,
            );
        }));
    }

    render_worker(
        0,
        seed,
        &world,
        &camera,
        &queue,
        &buffer,
        &progress,
        settings.image_width,
        settings.samples_per_pixel,
        settings.max_depth,
        settings.background,
    );

    for w in workers {
        w.join().expect("render worker panicked");
    }

    progress.done();
    log::debug!("rendered {} tiles across {} threads", total_tiles, thread_count);

    Arc::try_unwrap(buffer)
        .unwrap_or_else(|_| panic!("render buffer still shared after all workers joined"))
        .into_inner()
        .expect("render buffer mutex poisoned")
}

#[allow(clippy::too_many_arguments)]
fn render_worker(
    worker_id: u64,
    seed: u64,
    world: &SyncHittable,
    camera: &Camera,
    queue: &Mutex<Vec<Tile>>,
    buffer: &Mutex<Vec<RGB>>,
    progress: &Progress,
    image_width: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    background: RGB,
) {
    let mut rng = SmallRng::seed_from_u64(seed ^ worker_id.wrapping_mul(0x9E37_79B9_7F4A_7C15));

    loop {
        let tile = {
            let mut q = queue.lock().expect("tile queue lock poisoned");
            q.pop()
        };
        let tile = match tile {
            Some(t) => t,
            None => break,
        };

        for j in tile.y0..tile.y1 {
            for i in tile.x0..tile.x1 {
                let mut sum = RGB::black();
                for _ in 0..samples_per_pixel {
                    let ray = camera.get_ray(i, j, &mut rng);
                    sum = sum + ray_color(&ray, world, background, max_depth, &mut rng);
                }

                let mut pixels = buffer.lock().expect("pixel buffer lock poisoned");
                pixels[(j * image_width + i) as usize] = sum;
            }
        }

        progress.update(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point3;
    use crate::scene::demos;
    use crate::vector::Vector3;

    #[test]
    fn depth_zero_returns_black_regardless_of_world() {
        let scene = demos::build(0).unwrap();
        let r = Ray::new(Point3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        let mut rng = SmallRng::seed_from_u64(1);
        let c = ray_color(&r, &scene.world, scene.background, 0, &mut rng);
        assert_eq!((c.r(), c.g(), c.b()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn empty_world_returns_background_unchanged() {
        let scene = demos::build(5).unwrap();
        let r = Ray::new(Point3::new(0.0, 0.0, 3.0), Vector3::new(0.3, 0.1, -1.0));
        let mut rng = SmallRng::seed_from_u64(2);
        let c = ray_color(&r, &scene.world, scene.background, scene.max_depth, &mut rng);
        assert_eq!((c.r(), c.g(), c.b()), (scene.background.r(), scene.background.g(), scene.background.b()));
    }

    #[test]
    fn center_pixel_of_single_sphere_scene_is_non_black() {
        let scene = demos::build(0).unwrap();
        let world: Arc<SyncHittable> = match scene.world {
            crate::scene::World::List(list) => Arc::new(list),
            crate::scene::World::Accelerated { .. } => unreachable!(),
        };
        let camera = Arc::new(scene.camera);

        let settings = RenderSettings {
            image_width: scene.image_width,
            image_height: scene.image_height,
            samples_per_pixel: scene.samples_per_pixel,
            max_depth: scene.max_depth,
            background: scene.background,
            thread_count: 1,
        };
        let pixels = render(world, camera, &settings, 7);

        // A 2x2 image: every pixel's jittered sample should graze the
        // unit sphere filling most of the frame from this camera distance.
        let any_lit = pixels.iter().any(|c| c.r() > 0.0);
        assert!(any_lit);
    }

    #[test]
    fn single_threaded_render_is_deterministic_for_a_fixed_seed() {
        let scene_a = demos::build(4).unwrap();
        let scene_b = demos::build(4).unwrap();

        let settings = RenderSettings {
            image_width: scene_a.image_width,
            image_height: scene_a.image_height,
            samples_per_pixel: scene_a.samples_per_pixel,
            max_depth: scene_a.max_depth,
            background: scene_a.background,
            thread_count: 1,
        };

        let world_a: Arc<SyncHittable> = match scene_a.world {
            crate::scene::World::List(list) => Arc::new(list),
            crate::scene::World::Accelerated { .. } => unreachable!(),
        };
        let world_b: Arc<SyncHittable> = match scene_b.world {
            crate::scene::World::List(list) => Arc::new(list),
            crate::scene::World::Accelerated { .. } => unreachable!(),
        };

        let a = render(world_a, Arc::new(scene_a.camera), &settings, 99);
        let b = render(world_b, Arc::new(scene_b.camera), &settings, 99);

        for (pa, pb) in a.iter().zip(b.iter()) {
            assert_eq!((pa.r(), pa.g(), pa.b()), (pb.r(), pb.g(), pb.b()));
        }
    }
}
