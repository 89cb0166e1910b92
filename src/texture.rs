use crate::color::RGB;
use crate::point::Point3;

use image::{DynamicImage, GenericImageView};
use std::sync::Arc;

// Textures are pure functions of (u, v, p); no mutation, no caching across
// queries.
pub trait Texture {
    fn value(&self, u: f32, v: f32, p: &Point3) -> RGB;
}
pub type SyncTexture = dyn Texture + Send + Sync;

pub struct Constant {
    color: RGB,
}

impl Constant {
    pub fn new(color: RGB) -> Constant {
        Constant { color }
    }
}

impl Texture for Constant {
    fn value(&self, _u: f32, _v: f32, _p: &Point3) -> RGB {
        self.color
    }
}

// Checker pattern over world-space position; used where a texture-mapped
// (u, v) doesn't mean much (infinite planes, or just matching the teacher's
// original 3D checker).
pub struct Checker3D {
    inv_scale: f32,
    even: Arc<SyncTexture>,
    odd: Arc<SyncTexture>,
}

impl Checker3D {
    pub fn new(scale: f32, even: Arc<SyncTexture>, odd: Arc<SyncTexture>) -> Checker3D {
        Checker3D {
            inv_scale: 1.0_f32 / scale,
            even,
            odd,
        }
    }
}

impl Texture for Checker3D {
    fn value(&self, u: f32, v: f32, p: &Point3) -> RGB {
        let sum = (self.inv_scale * p.x()).floor()
            + (self.inv_scale * p.y()).floor()
            + (self.inv_scale * p.z()).floor();
        if (sum as i64) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

// Checker pattern over surface parameterization; used for spheres/quads
// where (u, v) is meaningful.
pub struct Checker2D {
    inv_scale: f32,
    even: Arc<SyncTexture>,
    odd: Arc<SyncTexture>,
}

impl Checker2D {
    pub fn new(scale: f32, even: Arc<SyncTexture>, odd: Arc<SyncTexture>) -> Checker2D {
        Checker2D {
            inv_scale: 1.0_f32 / scale,
            even,
            odd,
        }
    }
}

impl Texture for Checker2D {
    fn value(&self, u: f32, v: f32, p: &Point3) -> RGB {
        let sum = (self.inv_scale * u).floor() + (self.inv_scale * v).floor();
        if (sum as i64) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

pub enum GradientAxis {
    U,
    V,
    UV,
}

// Linear blend of two sub-textures along u, v, or u*v.
pub struct Gradient {
    axis: GradientAxis,
    from: Arc<SyncTexture>,
    to: Arc<SyncTexture>,
}

impl Gradient {
    pub fn new(axis: GradientAxis, from: Arc<SyncTexture>, to: Arc<SyncTexture>) -> Gradient {
        Gradient { axis, from, to }
    }
}

impl Texture for Gradient {
    fn value(&self, u: f32, v: f32, p: &Point3) -> RGB {
        let t = match self.axis {
            GradientAxis::U => u,
            GradientAxis::V => v,
            GradientAxis::UV => u * v,
        }
        .clamp(0.0_f32, 1.0_f32);

        self.from.value(u, v, p) * (1.0_f32 - t) + self.to.value(u, v, p) * t
    }
}

// Samples a decoded 2D pixel buffer. A missing image (decode failure) is
// represented as `None` and returns a cyan sentinel rather than failing.
pub struct Image {
    img: Option<Arc<DynamicImage>>,
}

impl Image {
    pub fn new(img: Arc<DynamicImage>) -> Image {
        Image { img: Some(img) }
    }

    pub fn missing() -> Image {
        Image { img: None }
    }
}

impl Texture for Image {
    fn value(&self, u: f32, v: f32, _p: &Point3) -> RGB {
        let img = match &self.img {
            Some(img) => img,
            None => return RGB::cyan(),
        };

        let u = u.clamp(0.0_f32, 1.0_f32);
        let v = 1.0_f32 - v.clamp(0.0_f32, 1.0_f32);

        let width = img.width();
        let height = img.height();
        if width == 0 || height == 0 {
            return RGB::cyan();
        }

        let i = ((u * width as f32) as u32).min(width - 1);
        let j = ((v * height as f32) as u32).min(height - 1);
        let pixel = img.get_pixel(i, j);

        RGB::new(
            pixel[0] as f32 / 255.0_f32,
            pixel[1] as f32 / 255.0_f32,
            pixel[2] as f32 / 255.0_f32,
        )
    }
}

// Perlin noise, ported from the teacher's `utils::noise`/`utils::turbulence`
// (a hash-grid gradient noise, not Ken Perlin's improved variant) onto the
// current `Point3` accessor methods.
const NOISE_SIZE: usize = 256;
const NOISE_DATA: [usize; NOISE_SIZE * 2] = [
    63, 147, 186, 78, 92, 53, 229, 76, 14, 204, 183, 99, 237, 241, 59, 167, 118, 23, 29, 44, 82,
    37, 6, 249, 131, 253, 210, 28, 71, 96, 3, 207, 115, 32, 158, 61, 215, 220, 116, 40, 48, 93,
    179, 196, 141, 0, 165, 185, 145, 217, 139, 216, 250, 235, 39, 232, 124, 146, 5, 77, 180, 4, 31,
    203, 154, 178, 226, 25, 20, 130, 22, 240, 252, 163, 75, 90, 51, 89, 151, 193, 33, 69, 21, 149,
    208, 244, 238, 191, 161, 36, 38, 81, 181, 56, 43, 127, 34, 243, 65, 200, 97, 247, 79, 231, 98,
    11, 100, 142, 15, 166, 45, 209, 223, 66, 119, 155, 49, 153, 113, 41, 133, 197, 157, 112, 46,
    91, 74, 27, 128, 228, 16, 248, 174, 187, 87, 95, 30, 110, 212, 175, 144, 135, 225, 172, 221,
    170, 67, 9, 111, 224, 239, 176, 117, 109, 177, 202, 132, 80, 125, 62, 251, 108, 148, 103, 227,
    50, 17, 35, 24, 126, 164, 42, 156, 10, 182, 218, 70, 246, 150, 73, 213, 138, 129, 189, 188, 84,
    160, 134, 105, 83, 169, 121, 233, 194, 19, 114, 55, 211, 58, 104, 254, 57, 18, 123, 102, 140,
    8, 171, 68, 206, 168, 86, 136, 152, 47, 60, 88, 101, 26, 122, 13, 192, 94, 198, 64, 234, 195,
    52, 245, 54, 236, 219, 12, 106, 143, 120, 7, 190, 1, 2, 205, 222, 159, 162, 173, 85, 107, 201,
    184, 214, 137, 230, 255, 242, 72, 199,
    63, 147, 186, 78, 92, 53, 229, 76, 14, 204, 183, 99, 237, 241, 59, 167, 118, 23, 29, 44, 82,
    37, 6, 249, 131, 253, 210, 28, 71, 96, 3, 207, 115, 32, 158, 61, 215, 220, 116, 40, 48, 93,
    179, 196, 141, 0, 165, 185, 145, 217, 139, 216, 250, 235, 39, 232, 124, 146, 5, 77, 180, 4, 31,
    203, 154, 178, 226, 25, 20, 130, 22, 240, 252, 163, 75, 90, 51, 89, 151, 193, 33, 69, 21, 149,
    208, 244, 238, 191, 161, 36, 38, 81, 181, 56, 43, 127, 34, 243, 65, 200, 97, 247, 79, 231, 98,
    11, 100, 142, 15, 166, 45, 209, 223, 66, 119, 155, 49, 153, 113, 41, 133, 197, 157, 112, 46,
    91, 74, 27, 128, 228, 16, 248, 174, 187, 87, 95, 30, 110, 212, 175, 144, 135, 225, 172, 221,
    170, 67, 9, 111, 224, 239, 176, 117, 109, 177, 202, 132, 80, 125, 62, 251, 108, 148, 103, 227,
    50, 17, 35, 24, 126, 164, 42, 156, 10, 182, 218, 70, 246, 150, 73, 213, 138, 129, 189, 188, 84,
    160, 134, 105, 83, 169, 121, 233, 194, 19, 114, 55, 211, 58, 104, 254, 57, 18, 123, 102, 140,
    8, 171, 68, 206, 168, 86, 136, 152, 47, 60, 88, 101, 26, 122, 13, 192, 94, 198, 64, 234, 195,
    52, 245, 54, 236, 219, 12, 106, 143, 120, 7, 190, 1, 2, 205, 222, 159, 162, 173, 85, 107, 201,
    184, 214, 137, 230, 255, 242, 72, 199,
];

fn noise_gradient(x: i32, y: i32, z: i32, dx: f32, dy: f32, dz: f32) -> f32 {
    let mut val = NOISE_DATA[NOISE_DATA[NOISE_DATA[x as usize] + y as usize] + z as usize];
    val &= 15;
    let mut u = if val < 8 || val == 12 || val == 13 { dx } else { dy };
    let mut v = if val < 4 || val == 12 || val == 13 { dy } else { dz };
    if val & 1 > 0 {
        u = -u;
    }
    if val & 2 > 0 {
        v = -v;
    }
    u + v
}

fn smoothstep(f: f32) -> f32 {
    let f3 = f * f * f;
    let f4 = f3 * f;
    6.0_f32 * f4 * f - 15.0_f32 * f4 + 10.0_f32 * f3
}

fn perlin_noise(p: &Point3) -> f32 {
    let mut ix = p.x().floor() as i32;
    let mut iy = p.y().floor() as i32;
    let mut iz = p.z().floor() as i32;

    let dx = p.x() - ix as f32;
    let dy = p.y() - iy as f32;
    let dz = p.z() - iz as f32;

    ix &= NOISE_SIZE as i32 - 1;
    iy &= NOISE_SIZE as i32 - 1;
    iz &= NOISE_SIZE as i32 - 1;

    let w000 = noise_gradient(ix, iy, iz, dx, dy, dz);
    let w100 = noise_gradient(ix + 1, iy, iz, dx - 1.0, dy, dz);
    let w010 = noise_gradient(ix, iy + 1, iz, dx, dy - 1.0, dz);
    let w001 = noise_gradient(ix, iy, iz + 1, dx, dy, dz - 1.0);
    let w110 = noise_gradient(ix + 1, iy + 1, iz, dx - 1.0, dy - 1.0, dz);
    let w101 = noise_gradient(ix + 1, iy, iz + 1, dx - 1.0, dy, dz - 1.0);
    let w011 = noise_gradient(ix, iy + 1, iz + 1, dx, dy - 1.0, dz - 1.0);
    let w111 = noise_gradient(ix + 1, iy + 1, iz + 1, dx - 1.0, dy - 1.0, dz - 1.0);

    let wx = smoothstep(dx);
    let wy = smoothstep(dy);

    let x00 = w000 + wx * (w100 - w000);
    let x10 = w010 + wx * (w110 - w010);
    let x01 = w001 + wx * (w101 - w001);
    let x11 = w011 + wx * (w111 - w011);
    let y0 = x00 + wy * (x10 - x00);
    let y1 = x01 + wy * (x11 - x01);
    y0 + wy * (y1 - y0)
}

fn perlin_turbulence(p: &Point3, depth: u32, omega: f32) -> f32 {
    let mut sum = 0.0_f32;
    let mut p = *p;
    let mut weight = 1.0_f32;

    for _ in 0..depth {
        sum += weight * perlin_noise(&p);
        weight *= omega;
        p = p * 1.99_f32;
    }

    sum.abs()
}

// Solid-color texture modulated by raw Perlin noise, remapped to [0, 1].
pub struct Noise {
    color: RGB,
    scale: f32,
}

impl Noise {
    pub fn new(color: RGB, scale: f32) -> Noise {
        Noise { color, scale }
    }
}

impl Texture for Noise {
    fn value(&self, _u: f32, _v: f32, p: &Point3) -> RGB {
        let n = 0.5_f32 * (1.0_f32 + perlin_noise(&(*p * self.scale)));
        self.color * n
    }
}

// Marble-like texture: color modulated by a sine wave perturbed by summed
// octaves of Perlin noise (turbulence).
pub struct Turbulence {
    color: RGB,
    scale: f32,
    depth: u32,
}

impl Turbulence {
    pub fn new(color: RGB, scale: f32, depth: u32) -> Turbulence {
        Turbulence { color, scale, depth }
    }
}

impl Texture for Turbulence {
    fn value(&self, _u: f32, _v: f32, p: &Point3) -> RGB {
        let marble = 1.0_f32 + (self.scale * p.z() + 10.0_f32 * perlin_turbulence(p, self.depth, 0.5_f32)).sin();
        self.color * (0.5_f32 * marble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_always_returns_the_same_color() {
        let t = Constant::new(RGB::new(0.1, 0.2, 0.3));
        let c = t.value(0.5, 0.5, &Point3::origin());
        assert_eq!((c.r(), c.g(), c.b()), (0.1, 0.2, 0.3));
    }

    #[test]
    fn checker_3d_alternates_with_world_position() {
        let even = Arc::new(Constant::new(RGB::white()));
        let odd = Arc::new(Constant::new(RGB::black()));
        let checker = Checker3D::new(1.0, even, odd);

        let a = checker.value(0.0, 0.0, &Point3::new(0.5, 0.5, 0.5));
        let b = checker.value(0.0, 0.0, &Point3::new(1.5, 0.5, 0.5));
        assert_ne!((a.r(), a.g(), a.b()), (b.r(), b.g(), b.b()));
    }

    #[test]
    fn checker_2d_alternates_with_uv() {
        let even = Arc::new(Constant::new(RGB::white()));
        let odd = Arc::new(Constant::new(RGB::black()));
        let checker = Checker2D::new(1.0, even, odd);

        let a = checker.value(0.5, 0.5, &Point3::origin());
        let b = checker.value(1.5, 0.5, &Point3::origin());
        assert_ne!((a.r(), a.g(), a.b()), (b.r(), b.g(), b.b()));
    }

    #[test]
    fn gradient_interpolates_linearly_by_u() {
        let from = Arc::new(Constant::new(RGB::black()));
        let to = Arc::new(Constant::new(RGB::white()));
        let grad = Gradient::new(GradientAxis::U, from, to);

        let mid = grad.value(0.5, 0.0, &Point3::origin());
        assert!((mid.r() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_image_returns_cyan_sentinel() {
        let img = Image::missing();
        let c = img.value(0.5, 0.5, &Point3::origin());
        assert_eq!((c.r(), c.g(), c.b()), (0.0, 1.0, 1.0));
    }

    #[test]
    fn noise_is_deterministic_for_the_same_point() {
        let noise = Noise::new(RGB::white(), 4.0);
        let a = noise.value(0.0, 0.0, &Point3::new(1.2, 3.4, 5.6));
        let b = noise.value(0.0, 0.0, &Point3::new(1.2, 3.4, 5.6));
        assert_eq!((a.r(), a.g(), a.b()), (b.r(), b.g(), b.b()));
    }

    #[test]
    fn noise_stays_within_the_color_envelope() {
        let noise = Noise::new(RGB::white(), 4.0);
        for i in 0..20 {
            let c = noise.value(0.0, 0.0, &Point3::new(i as f32 * 0.37, 0.0, 0.0));
            assert!(c.r() >= -1e-4 && c.r() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn turbulence_varies_across_space() {
        let marble = Turbulence::new(RGB::white(), 4.0, 7);
        let a = marble.value(0.0, 0.0, &Point3::new(0.0, 0.0, 0.0));
        let b = marble.value(0.0, 0.0, &Point3::new(5.0, 5.0, 5.0));
        assert_ne!((a.r(), a.g(), a.b()), (b.r(), b.g(), b.b()));
    }
}
