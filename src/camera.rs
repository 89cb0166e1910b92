use crate::point::Point3;
use crate::ray::Ray;
use crate::vector::Vector3;

use rand::Rng;

// Builds the viewport basis once at construction; `get_ray` then only does
// the per-pixel jitter and (optional) defocus-disk sampling, threading the
// caller's RNG rather than reaching for a global one.
pub struct Camera {
    look_from: Point3,
    pixel00: Point3,
    pixel_delta_u: Vector3,
    pixel_delta_v: Vector3,
    defocus_disk_u: Vector3,
    defocus_disk_v: Vector3,
    defocus_angle: f32,
}

impl Camera {
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        v_up: Vector3,
        vertical_fov_degrees: f32,
        aspect_ratio: f32,
        defocus_angle: f32,
        focus_dist: f32,
    ) -> Camera {
        let theta = vertical_fov_degrees * (std::f32::consts::PI / 180.0_f32);
        let viewport_height = 2.0_f32 * (theta / 2.0_f32).tan() * focus_dist;
        let viewport_width = viewport_height * aspect_ratio;

        let w = (look_from - look_at).normalized();
        let u = v_up.cross(w).normalized();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        Camera {
            look_from,
            pixel00: look_from - (focus_dist * w) - viewport_u / 2.0_f32 - viewport_v / 2.0_f32,
            pixel_delta_u: viewport_u,
            pixel_delta_v: viewport_v,
            defocus_disk_u: u * (focus_dist * (defocus_angle.to_radians() / 2.0_f32).tan()),
            defocus_disk_v: v * (focus_dist * (defocus_angle.to_radians() / 2.0_f32).tan()),
            defocus_angle,
        }
    }

    // `image_width`/`image_height` scale the raw viewport deltas computed in
    // `new` down to per-pixel deltas; kept as a separate step (rather than
    // folded into `new`) so the same camera basis can re-target different
    // output resolutions.
    pub fn for_resolution(mut self, image_width: u32, image_height: u32) -> Camera {
        self.pixel_delta_u = self.pixel_delta_u / image_width as f32;
        self.pixel_delta_v = self.pixel_delta_v / image_height as f32;
        self.pixel00 = self.pixel00 + 0.5_f32 * (self.pixel_delta_u + self.pixel_delta_v);
        self
    }

    pub fn get_ray<R: Rng + ?Sized>(&self, i: u32, j: u32, rng: &mut R) -> Ray {
        let pixel_center = self.pixel00 + (i as f32) * self.pixel_delta_u + (j as f32) * self.pixel_delta_v;
        let jitter_u = rng.gen_range(-0.5_f32..0.5_f32);
        let jitter_v = rng.gen_range(-0.5_f32..0.5_f32);
        let pixel_sample = pixel_center + jitter_u * self.pixel_delta_u + jitter_v * self.pixel_delta_v;

        let origin = if self.defocus_angle <= 0.0_f32 {
            self.look_from
        } else {
            let disk = Vector3::random_in_unit_disk(rng);
            self.look_from + disk.x() * self.defocus_disk_u + disk.y() * self.defocus_disk_v
        };

        Ray::new(origin, pixel_sample - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn ray_direction_is_normalized() {
        let cam = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(100, 100);

        let mut rng = SmallRng::seed_from_u64(1);
        let r = cam.get_ray(50, 50, &mut rng);
        assert!((r.dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_defocus_angle_keeps_every_ray_origin_at_look_from() {
        let look_from = Point3::new(0.0, 0.0, 3.0);
        let cam = Camera::new(
            look_from,
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(10, 10);

        let mut rng = SmallRng::seed_from_u64(2);
        let r = cam.get_ray(3, 7, &mut rng);
        assert_eq!((r.origin.x(), r.origin.y(), r.origin.z()), (look_from.x(), look_from.y(), look_from.z()));
    }

    #[test]
    fn center_pixel_points_roughly_towards_look_at() {
        let cam = Camera::new(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vector3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
            0.0,
            3.0,
        )
        .for_resolution(101, 101);

        let mut rng = SmallRng::seed_from_u64(3);
        let r = cam.get_ray(50, 50, &mut rng);
        assert!(r.dir.z() < 0.0);
    }
}
