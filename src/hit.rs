use crate::aabb::AABB;
use crate::material::MaterialHandle;
use crate::point::Point3;
use crate::ray::Ray;
use crate::vector::Vector3;

// Transient carrier for a successful intersection. `front_face` records
// whether the ray approached the outward-facing side of the surface, and
// `normal` is always oriented to point back towards the ray's origin side.
pub struct HitRecord {
    pub p: Point3,
    pub normal: Vector3,
    pub t: f32,
    pub u: f32,
    pub v: f32,
    pub front_face: bool,
    pub material: MaterialHandle,
}

impl HitRecord {
    pub fn new(
        p: Point3,
        t: f32,
        u: f32,
        v: f32,
        ray: &Ray,
        outward_normal: Vector3,
        material: MaterialHandle,
    ) -> HitRecord {
        let front_face = ray.dir.dot(outward_normal) < 0.0_f32;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        HitRecord {
            p,
            normal,
            t,
            u,
            v,
            front_face,
            material,
        }
    }
}

// Anything that can be tested against a ray and yield a hit record. Infinite
// planes implement only this tier, since they are not boundable and
// therefore cannot be a BVH leaf.
pub trait Hittable {
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord>;
}
pub type SyncHittable = dyn Hittable + Send + Sync;

// Primitives additionally expose a bounded centroid and a growable AABB,
// which is what makes them admissible as BVH leaves.
pub trait Primitive: Hittable {
    fn centroid(&self) -> Point3;
    fn grow_aabb(&self, aabb: &mut AABB);
}
pub type SyncPrimitive = dyn Primitive + Send + Sync;

#[cfg(test)]
mod tests {
    use super::*;

    use crate::material::Lambertian;
    use crate::texture::Constant;
    use crate::color::RGB;
    use std::sync::Arc;

    fn dummy_material() -> MaterialHandle {
        Arc::new(Lambertian::new(Arc::new(Constant::new(RGB::white()))))
    }

    #[test]
    fn set_face_normal_keeps_outward_normal_for_front_face_hit() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let outward = Vector3::new(0.0, 0.0, -1.0);
        let rec = HitRecord::new(Point3::origin(), 1.0, 0.0, 0.0, &ray, outward, dummy_material());
        assert!(rec.front_face);
        assert!((rec.normal.z() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_face_normal_flips_normal_for_back_face_hit() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        let outward = Vector3::new(0.0, 0.0, 1.0);
        let rec = HitRecord::new(Point3::origin(), 1.0, 0.0, 0.0, &ray, outward, dummy_material());
        assert!(!rec.front_face);
        assert!((rec.normal.z() + 1.0).abs() < 1e-6);
    }
}
