use crate::aabb::AABB;
use crate::hit::{HitRecord, Hittable, Primitive};
use crate::material::MaterialHandle;
use crate::point::Point3;
use crate::ray::Ray;
use crate::vector::Vector3;

use std::f32;
use std::sync::Arc;

const NEAR_ZERO: f32 = 1e-8;

const ONE_OVER_2_PI: f32 = 1.0_f32 / (2.0_f32 * f32::consts::PI);

// A sphere's normal flips inward when `radius` is negative, which is how a
// dielectric "hollow glass" shell is built: the outer and inner surface of
// the shell are two spheres sharing a center, one with a negated radius.
pub struct Sphere {
    center: Point3,
    radius: f32,
    material: MaterialHandle,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32, material: MaterialHandle) -> Sphere {
        Sphere {
            center,
            radius,
            material,
        }
    }

    fn uv(&self, outward_normal: Vector3) -> (f32, f32) {
        let u = (1.0_f32 - (outward_normal.z().atan2(outward_normal.x()) + f32::consts::PI) * ONE_OVER_2_PI)
            .rem_euclid(1.0_f32);
        let v = (outward_normal.y().asin() + f32::consts::FRAC_PI_2) * f32::consts::FRAC_1_PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let oc = r.origin - self.center;
        let a = r.dir.squared_length();
        let half_b = oc.dot(r.dir);
        let c = oc.squared_length() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0_f32 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let mut t_hit = (-half_b - sqrt_d) / a;
        if t_hit <= t_min || t_hit >= t_max {
            t_hit = (-half_b + sqrt_d) / a;
            if t_hit <= t_min || t_hit >= t_max {
                return None;
            }
        }

        let p = r.point_at(t_hit);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = self.uv(outward_normal);
        Some(HitRecord::new(p, t_hit, u, v, r, outward_normal, self.material.clone()))
    }
}

impl Primitive for Sphere {
    fn centroid(&self) -> Point3 {
        self.center
    }

    fn grow_aabb(&self, aabb: &mut AABB) {
        let r = self.radius.abs();
        let extent = Vector3::new(r, r, r);
        aabb.grow(self.center - extent);
        aabb.grow(self.center + extent);
    }
}

// Shared backing storage for a mesh's triangles, loaded once by `mesh.rs`
// and referenced by index from every `Triangle` that belongs to it so
// vertex data is never duplicated per-face.
pub struct TriangleMesh {
    pub vertices: Vec<Point3>,
    pub material: MaterialHandle,
}

pub struct Triangle {
    mesh: Arc<TriangleMesh>,
    v0: usize,
    v1: usize,
    v2: usize,
}

impl Triangle {
    pub fn new(mesh: Arc<TriangleMesh>, v0: usize, v1: usize, v2: usize) -> Triangle {
        Triangle { mesh, v0, v1, v2 }
    }

    fn vertices(&self) -> (Point3, Point3, Point3) {
        (
            self.mesh.vertices[self.v0],
            self.mesh.vertices[self.v1],
            self.mesh.vertices[self.v2],
        )
    }
}

impl Hittable for Triangle {
    // Moller-Trumbore ray-triangle intersection; no backface culling, since
    // this crate's materials are expected to handle both sides via
    // `front_face` (see `material::TwoSided`).
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let (vertex0, vertex1, vertex2) = self.vertices();
        let edge1 = vertex1 - vertex0;
        let edge2 = vertex2 - vertex0;

        let p_vec = r.dir.cross(edge2);
        let determinant = edge1.dot(p_vec);
        if determinant.abs() < f32::EPSILON {
            return None;
        }
        let inv_determinant = 1.0_f32 / determinant;

        let t_vec = r.origin - vertex0;
        let u = t_vec.dot(p_vec) * inv_determinant;
        if u < 0.0_f32 || u > 1.0_f32 {
            return None;
        }

        let q_vec = t_vec.cross(edge1);
        let v = r.dir.dot(q_vec) * inv_determinant;
        if v < 0.0_f32 || u + v > 1.0_f32 {
            return None;
        }

        let t_hit = edge2.dot(q_vec) * inv_determinant;
        if t_hit <= t_min || t_hit >= t_max {
            return None;
        }

        let p = r.point_at(t_hit);
        let outward_normal = edge1.cross(edge2).normalized();
        Some(HitRecord::new(
            p,
            t_hit,
            u,
            v,
            r,
            outward_normal,
            self.mesh.material.clone(),
        ))
    }
}

impl Primitive for Triangle {
    fn centroid(&self) -> Point3 {
        let (v0, v1, v2) = self.vertices();
        Point3::new(
            (v0.x() + v1.x() + v2.x()) / 3.0_f32,
            (v0.y() + v1.y() + v2.y()) / 3.0_f32,
            (v0.z() + v1.z() + v2.z()) / 3.0_f32,
        )
    }

    fn grow_aabb(&self, aabb: &mut AABB) {
        let (v0, v1, v2) = self.vertices();
        aabb.grow(v0);
        aabb.grow(v1);
        aabb.grow(v2);
    }
}

// Parallelogram spanned by two edge vectors from a corner `q`. Grounded on
// the plane-intersection-then-barycentric-interior-test approach (not a
// Moller-Trumbore pair of triangles).
pub struct Quad {
    q: Point3,
    u_edge: Vector3,
    v_edge: Vector3,
    normal: Vector3,
    w: Vector3,
    d: f32,
    material: MaterialHandle,
}

impl Quad {
    pub fn new(q: Point3, u_edge: Vector3, v_edge: Vector3, material: MaterialHandle) -> Quad {
        let n = u_edge.cross(v_edge);
        let normal = n.normalized();
        let d = normal.dot(q - Point3::origin());
        let w = n / n.squared_length();
        Quad {
            q,
            u_edge,
            v_edge,
            normal,
            w,
            d,
            material,
        }
    }
}

impl Hittable for Quad {
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let denom = self.normal.dot(r.dir);
        if denom.abs() < NEAR_ZERO {
            return None;
        }

        let t_hit = (self.d - self.normal.dot(r.origin - Point3::origin())) / denom;
        if t_hit <= t_min || t_hit >= t_max {
            return None;
        }

        let p = r.point_at(t_hit);
        let planar_hitpt = p - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v_edge));
        let beta = self.w.dot(self.u_edge.cross(planar_hitpt));
        if alpha < 0.0_f32 || alpha > 1.0_f32 || beta < 0.0_f32 || beta > 1.0_f32 {
            return None;
        }

        Some(HitRecord::new(p, t_hit, alpha, beta, r, self.normal, self.material.clone()))
    }
}

impl Primitive for Quad {
    fn centroid(&self) -> Point3 {
        self.q + (self.u_edge + self.v_edge) * 0.5_f32
    }

    fn grow_aabb(&self, aabb: &mut AABB) {
        aabb.grow(self.q);
        aabb.grow(self.q + self.u_edge);
        aabb.grow(self.q + self.v_edge);
        aabb.grow(self.q + self.u_edge + self.v_edge);
    }
}

// Tagged enum over every BVH-indexable primitive, so the BVH's hot inner
// loop dispatches with a match rather than a vtable call.
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Quad(Quad),
}

impl Hittable for Shape {
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        match self {
            Shape::Sphere(s) => s.hit(r, t_min, t_max),
            Shape::Triangle(t) => t.hit(r, t_min, t_max),
            Shape::Quad(q) => q.hit(r, t_min, t_max),
        }
    }
}

impl Primitive for Shape {
    fn centroid(&self) -> Point3 {
        match self {
            Shape::Sphere(s) => s.centroid(),
            Shape::Triangle(t) => t.centroid(),
            Shape::Quad(q) => q.centroid(),
        }
    }

    fn grow_aabb(&self, aabb: &mut AABB) {
        match self {
            Shape::Sphere(s) => s.grow_aabb(aabb),
            Shape::Triangle(t) => t.grow_aabb(aabb),
            Shape::Quad(q) => q.grow_aabb(aabb),
        }
    }
}

// Infinite plane. Unbounded, so it is never a BVH leaf; used only as a
// non-indexed backdrop tested by linear scan alongside the BVH.
pub struct Plane {
    center: Point3,
    normal: Vector3,
    material: MaterialHandle,
}

impl Plane {
    pub fn new(center: Point3, normal: Vector3, material: MaterialHandle) -> Plane {
        Plane {
            center,
            normal: normal.normalized(),
            material,
        }
    }
}

impl Hittable for Plane {
    fn hit(&self, r: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let denom = self.normal.dot(r.dir);
        if denom.abs() < NEAR_ZERO {
            return None;
        }

        let t_hit = (self.center - r.origin).dot(self.normal) / denom;
        if t_hit <= t_min || t_hit >= t_max {
            return None;
        }

        let p = r.point_at(t_hit);
        Some(HitRecord::new(p, t_hit, 0.0, 0.0, r, self.normal, self.material.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RGB;
    use crate::material::Lambertian;
    use crate::texture::Constant;

    fn white_material() -> MaterialHandle {
        Arc::new(Lambertian::new(Arc::new(Constant::new(RGB::white()))))
    }

    #[test]
    fn sphere_hit_returns_nearest_root_in_front_of_origin() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0, white_material());
        let r = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&r, 0.001, f32::MAX).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn sphere_with_negative_radius_has_inward_facing_normal() {
        let sphere = Sphere::new(Point3::origin(), -1.0, white_material());
        let r = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&r, 0.001, f32::MAX).unwrap();
        // The outward normal at (0,0,1) divided by a negative radius points
        // back towards the center, i.e. inward.
        assert!(rec.normal.z() > 0.0);
    }

    #[test]
    fn triangle_hit_respects_barycentric_bounds() {
        let mesh = Arc::new(TriangleMesh {
            vertices: vec![
                Point3::new(-1.0, -1.0, -2.0),
                Point3::new(1.0, -1.0, -2.0),
                Point3::new(0.0, 1.0, -2.0),
            ],
            material: white_material(),
        });
        let tri = Triangle::new(mesh, 0, 1, 2);

        let inside = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&inside, 0.001, f32::MAX).is_some());

        let outside = Ray::new(Point3::new(5.0, 5.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&outside, 0.001, f32::MAX).is_none());
    }

    #[test]
    fn quad_hit_rejects_points_outside_the_unit_parallelogram() {
        let quad = Quad::new(
            Point3::new(-1.0, -1.0, -2.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            white_material(),
        );

        let center = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&center, 0.001, f32::MAX).is_some());

        let outside = Ray::new(Point3::new(5.0, 5.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&outside, 0.001, f32::MAX).is_none());
    }

    #[test]
    fn plane_hit_reports_t_along_ray() {
        let plane = Plane::new(Point3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0), white_material());
        let r = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        let rec = plane.hit(&r, 0.001, f32::MAX).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-4);
    }
}
