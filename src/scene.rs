use crate::bvh::{Bvh, BvhStrategy};
use crate::camera::Camera;
use crate::color::RGB;
use crate::error::RtError;
use crate::hit::{HitRecord, Hittable, SyncHittable, SyncPrimitive};
use crate::material::{Dielectric, DiffuseLight, Lambertian, MaterialHandle};
use crate::point::Point3;
use crate::shape::{Plane, Quad, Shape, Sphere, Triangle, TriangleMesh};
use crate::texture::{Checker3D, Constant};
use crate::vector::Vector3;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

// Non-accelerated fallback container: a flat, linearly-scanned list of
// bounded primitives plus unbounded hittables (planes). Same nearest-hit
// contract as `Bvh`; used for tiny demo scenes and as the oracle a BVH's
// results are checked against.
#[derive(Default)]
pub struct HittableList {
    primitives: Vec<Arc<SyncPrimitive>>,
    unbounded: Vec<Arc<SyncHittable>>,
}

impl HittableList {
    pub fn new() -> HittableList {
        HittableList::default()
    }

    pub fn push_primitive(&mut self, primitive: Arc<SyncPrimitive>) {
        self.primitives.push(primitive);
    }

    pub fn push_unbounded(&mut self, hittable: Arc<SyncHittable>) {
        self.unbounded.push(hittable);
    }
}

impl Hittable for HittableList {
    fn hit(&self, r: &crate::ray::Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let mut closest = t_max;
        let mut best = None;
        for p in &self.primitives {
            if let Some(rec) = p.hit(r, t_min, closest) {
                closest = rec.t;
                best = Some(rec);
            }
        }
        for h in &self.unbounded {
            if let Some(rec) = h.hit(r, t_min, closest) {
                closest = rec.t;
                best = Some(rec);
            }
        }
        best
    }
}

// The render-time world: either the flat list above, or a BVH over the
// bounded primitives plus a linearly-scanned set of unbounded hittables
// (infinite planes) checked alongside it. Both variants answer the same
// `Hittable` contract, so the integrator never needs to know which one
// it was handed.
pub enum World {
    List(HittableList),
    Accelerated {
        bvh: Bvh,
        primitives: Vec<Arc<SyncPrimitive>>,
        unbounded: Vec<Arc<SyncHittable>>,
    },
}

impl Hittable for World {
    fn hit(&self, r: &crate::ray::Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        match self {
            World::List(list) => list.hit(r, t_min, t_max),
            World::Accelerated {
                bvh,
                primitives,
                unbounded,
            } => {
                let mut best = bvh.intersect_iterative(primitives, r, t_min, t_max);
                let mut closest = best.as_ref().map(|rec| rec.t).unwrap_or(t_max);
                for h in unbounded {
                    if let Some(rec) = h.hit(r, t_min, closest) {
                        closest = rec.t;
                        best = Some(rec);
                    }
                }
                best
            }
        }
    }
}

pub struct Scene {
    pub camera: Camera,
    pub world: World,
    pub background: RGB,
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
}

fn lambertian(color: RGB) -> MaterialHandle {
    Arc::new(Lambertian::new(Arc::new(Constant::new(color))))
}

// Hand-authored demo scenes standing in for the general scene-graph
// construction spec.md §1 explicitly excludes. Each function below builds
// exactly one of the end-to-end scenarios spec.md §8 describes.
pub mod demos {
    use super::*;

    pub fn build(index: usize) -> Result<Scene, RtError> {
        match index {
            0 => Ok(single_sphere()),
            1 => Ok(triangle_quad()),
            2 => Ok(random_triangles()),
            3 => Ok(cornell_box()),
            4 => Ok(glass_sphere()),
            5 => Ok(empty_world()),
            other => Err(RtError::UnknownDemo(other)),
        }
    }

    // 1. Single unit sphere at the origin, red Lambertian, viewed from
    // (0,0,3) at vfov=90 against a black background.
    fn single_sphere() -> Scene {
        let mut list = HittableList::new();
        let red = lambertian(RGB::new(0.9, 0.1, 0.1));
        list.push_primitive(Arc::new(Shape::Sphere(Sphere::new(Point3::origin(), 1.0, red))));

        let camera = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(2, 2);

        Scene {
            camera,
            world: World::List(list),
            background: RGB::black(),
            image_width: 2,
            image_height: 2,
            samples_per_pixel: 1,
            max_depth: 2,
        }
    }

    // 2. Two triangles forming a 2x2 quad at z=0, green Lambertian, a
    // narrow-fov camera looking straight down -z from (0,0,3).
    fn triangle_quad() -> Scene {
        let green = lambertian(RGB::new(0.1, 0.8, 0.2));
        let mesh = Arc::new(TriangleMesh {
            vertices: vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
            ],
            material: green,
        });

        let mut list = HittableList::new();
        list.push_primitive(Arc::new(Shape::Triangle(Triangle::new(mesh.clone(), 0, 1, 2))));
        list.push_primitive(Arc::new(Shape::Triangle(Triangle::new(mesh, 0, 2, 3))));

        let camera = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            20.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(100, 100);

        Scene {
            camera,
            world: World::List(list),
            background: RGB::black(),
            image_width: 100,
            image_height: 100,
            samples_per_pixel: 16,
            max_depth: 8,
        }
    }

    // 3. 128 random triangles in [-2.5, 2.5]^3 with edge length <= 0.5,
    // seed=42, accelerated with a binned-SAH BVH (B=48).
    fn random_triangles() -> Scene {
        let mut rng = SmallRng::seed_from_u64(42);
        let material = lambertian(RGB::new(0.6, 0.6, 0.7));

        let mut primitives: Vec<Arc<SyncPrimitive>> = Vec::with_capacity(128);
        for _ in 0..128 {
            let center = Point3::new(
                rng.gen_range(-2.5..2.5),
                rng.gen_range(-2.5..2.5),
                rng.gen_range(-2.5..2.5),
            );
            let edge = 0.5_f32;
            let mesh = Arc::new(TriangleMesh {
                vertices: vec![
                    center + Vector3::new(-edge / 2.0, -edge / 2.0, 0.0),
                    center + Vector3::new(edge / 2.0, -edge / 2.0, 0.0),
                    center + Vector3::new(0.0, edge / 2.0, 0.0),
                ],
                material: material.clone(),
            });
            primitives.push(Arc::new(Shape::Triangle(Triangle::new(mesh, 0, 1, 2))));
        }

        let bvh = Bvh::build(&primitives, BvhStrategy::BinnedSah { buckets: 48 });

        let camera = Camera::new(
            Point3::new(0.0, 0.0, 10.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            40.0,
            1.0,
            0.0,
            10.0,
        )
        .for_resolution(200, 200);

        Scene {
            camera,
            world: World::Accelerated {
                bvh,
                primitives,
                unbounded: Vec::new(),
            },
            background: RGB::new(0.5, 0.7, 1.0),
            image_width: 200,
            image_height: 200,
            samples_per_pixel: 32,
            max_depth: 8,
        }
    }

    // 4. Classic Cornell box: 5 walls + an overhead light at y=554, camera
    // at (278, 278, -800) looking at (278, 278, 0), vfov=40.
    fn cornell_box() -> Scene {
        let red = lambertian(RGB::new(0.65, 0.05, 0.05));
        let white = lambertian(RGB::new(0.73, 0.73, 0.73));
        let green = lambertian(RGB::new(0.12, 0.45, 0.15));
        let light: MaterialHandle = Arc::new(DiffuseLight::new(Arc::new(Constant::new(RGB::new(
            15.0, 15.0, 15.0,
        )))));

        let mut primitives: Vec<Arc<SyncPrimitive>> = Vec::new();
        let quad = |q: Point3, u: Vector3, v: Vector3, m: MaterialHandle| {
            Arc::new(Shape::Quad(Quad::new(q, u, v, m))) as Arc<SyncPrimitive>
        };

        primitives.push(quad(
            Point3::new(555.0, 0.0, 0.0),
            Vector3::new(0.0, 555.0, 0.0),
            Vector3::new(0.0, 0.0, 555.0),
            green,
        ));
        primitives.push(quad(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 555.0, 0.0),
            Vector3::new(0.0, 0.0, 555.0),
            red,
        ));
        primitives.push(quad(
            Point3::new(343.0, 554.0, 332.0),
            Vector3::new(-130.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -105.0),
            light,
        ));
        primitives.push(quad(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(555.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 555.0),
            white.clone(),
        ));
        primitives.push(quad(
            Point3::new(555.0, 555.0, 555.0),
            Vector3::new(-555.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -555.0),
            white.clone(),
        ));
        primitives.push(quad(
            Point3::new(0.0, 0.0, 555.0),
            Vector3::new(555.0, 0.0, 0.0),
            Vector3::new(0.0, 555.0, 0.0),
            white,
        ));

        let bvh = Bvh::build(&primitives, BvhStrategy::BinnedSah { buckets: 16 });

        let camera = Camera::new(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            40.0,
            1.0,
            0.0,
            800.0,
        )
        .for_resolution(300, 300);

        Scene {
            camera,
            world: World::Accelerated {
                bvh,
                primitives,
                unbounded: Vec::new(),
            },
            background: RGB::black(),
            image_width: 300,
            image_height: 300,
            samples_per_pixel: 4,
            max_depth: 5,
        }
    }

    // 5. Glass sphere (ior=1.5) over a checkered ground plane.
    fn glass_sphere() -> Scene {
        let mut list = HittableList::new();
        let glass: MaterialHandle = Arc::new(Dielectric::new(1.5));
        list.push_primitive(Arc::new(Shape::Sphere(Sphere::new(Point3::origin(), 1.0, glass))));

        let checker = Arc::new(Checker3D::new(
            0.5,
            Arc::new(Constant::new(RGB::new(0.2, 0.2, 0.2))),
            Arc::new(Constant::new(RGB::new(0.9, 0.9, 0.9))),
        ));
        let ground: MaterialHandle = Arc::new(Lambertian::new(checker));
        list.push_unbounded(Arc::new(Plane::new(
            Point3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            ground,
        )));

        let camera = Camera::new(
            Point3::new(0.0, 1.0, 4.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            40.0,
            1.0,
            0.0,
            4.0,
        )
        .for_resolution(200, 200);

        Scene {
            camera,
            world: World::List(list),
            background: RGB::new(0.5, 0.7, 1.0),
            image_width: 200,
            image_height: 200,
            samples_per_pixel: 32,
            max_depth: 10,
        }
    }

    // 6. Empty world; the integrator must return the background color
    // unchanged for every ray.
    fn empty_world() -> Scene {
        let camera = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(4, 4);

        Scene {
            camera,
            world: World::List(HittableList::new()),
            background: RGB::new(0.5, 0.7, 1.0),
            image_width: 4,
            image_height: 4,
            samples_per_pixel: 1,
            max_depth: 4,
        }
    }
}
