use crate::point::Point3;
use crate::ray::Ray;
use crate::vector::{Axis, Vector3};

use std::f32;

// Axis-aligned bounding box. Empty is encoded as min = +inf, max = -inf so
// that growing an empty box by any point or box is a plain componentwise
// min/max with no special-casing.
#[derive(Clone, Copy)]
pub struct AABB {
    pub min: Point3,
    pub max: Point3,
}

impl AABB {
    pub fn new(min: Point3, max: Point3) -> AABB {
        AABB { min, max }
    }

    pub fn empty() -> AABB {
        AABB {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn grow(&mut self, p: Point3) {
        self.min = Point3::min(self.min, p);
        self.max = Point3::max(self.max, p);
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: Point3::min(self.min, other.min),
            max: Point3::max(self.max, other.max),
        }
    }

    pub fn centroid(&self) -> Point3 {
        Point3::new(
            0.5 * (self.min.x() + self.max.x()),
            0.5 * (self.min.y() + self.max.y()),
            0.5 * (self.min.z() + self.max.z()),
        )
    }

    pub fn largest_axis(&self) -> Axis {
        let d = self.max - self.min;
        if d.x() > d.y() && d.x() > d.z() {
            Axis::X
        } else if d.y() > d.z() {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    // Half the surface area (ex*ey + ey*ez + ez*ex), the form the SAH cost
    // comparisons actually need; a missing factor of 2 cancels out of every
    // cost ratio this crate computes.
    pub fn area(&self) -> f32 {
        let d = self.max - self.min;
        if d.x() < 0.0 || d.y() < 0.0 || d.z() < 0.0 {
            return 0.0;
        }
        d.x() * d.y() + d.y() * d.z() + d.z() * d.x()
    }

    // Classic slab test. Returns (hit, t_enter); on a miss t_enter is +inf
    // so ordered BVH descent can treat a missed child as "do not visit"
    // without a second branch.
    pub fn slab_hit(&self, r: &Ray, t_min: f32, t_max: f32) -> (bool, f32) {
        let mut t_enter = t_min;
        let mut t_exit = t_max;

        for axis in Axis::ALL {
            let inv_d = 1.0 / r.dir[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_exit <= t_enter {
                return (false, f32::INFINITY);
            }
        }

        if t_exit >= t_enter && t_exit > 0.0 && t_enter < t_max {
            (true, t_enter)
        } else {
            (false, f32::INFINITY)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slab_hit_reports_entry_t_for_ray_below_box() {
        let b = AABB::new(Point3::new(-1.0, 2.0, -1.0), Point3::new(1.0, 4.0, 1.0));
        let r = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let (hit, t) = b.slab_hit(&r, 0.001, f32::MAX);
        assert!(hit);
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn slab_hit_misses_box_behind_ray_on_every_axis() {
        let b = AABB::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        let r = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let (hit, t) = b.slab_hit(&r, 0.001, f32::MAX);
        assert!(!hit);
        assert_eq!(t, f32::INFINITY);
    }

    #[test]
    fn area_matches_diagonal_formula() {
        let mut b = AABB::empty();
        b.grow(Point3::new(0.0, 0.0, 0.0));
        b.grow(Point3::new(2.0, 3.0, 4.0));
        let expected = 2.0 * 3.0 + 3.0 * 4.0 + 4.0 * 2.0;
        assert!((b.area() - expected).abs() < 1e-5);
    }

    #[test]
    fn union_of_two_boxes_contains_both() {
        let a = AABB::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = AABB::new(Point3::new(2.0, -1.0, 0.5), Point3::new(3.0, 0.0, 2.0));
        let u = a.union(&b);
        assert_eq!((u.min.x(), u.min.y(), u.min.z()), (0.0, -1.0, 0.0));
        assert_eq!((u.max.x(), u.max.y(), u.max.z()), (3.0, 1.0, 2.0));
    }
}
