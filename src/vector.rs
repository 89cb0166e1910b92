use crate::base::BasicThreeTuple;

use rand::Rng;
use std::ops;

pub struct Vector3(pub BasicThreeTuple<f32>);

// Vector3 implements the Copy trait because it is a small, constant piece
// of data. Vector3's are, ideally, not widely mutated. The compiler
// will aid in optimizing the copy process, such that excess copies
// are not required at runtime.
impl Copy for Vector3 {}
impl Clone for Vector3 {
    fn clone(&self) -> Vector3 {
        *self
    }
}

pub const NEAR_ZERO: f32 = 1e-8;

impl Vector3 {
    pub fn new_empty() -> Vector3 {
        Vector3(BasicThreeTuple::new(0_f32, 0_f32, 0_f32))
    }

    pub fn new_identity() -> Vector3 {
        Vector3(BasicThreeTuple::new(1_f32, 1_f32, 1_f32))
    }

    pub fn new(x: f32, y: f32, z: f32) -> Vector3 {
        Vector3(BasicThreeTuple::new(x, y, z))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }
    pub fn y(&self) -> f32 {
        self.0.y
    }
    pub fn z(&self) -> f32 {
        self.0.z
    }

    pub fn min(v1: Vector3, v2: Vector3) -> Vector3 {
        Vector3(BasicThreeTuple::min(v1.0, v2.0))
    }

    pub fn max(v1: Vector3, v2: Vector3) -> Vector3 {
        Vector3(BasicThreeTuple::max(v1.0, v2.0))
    }

    pub fn dot(self, other: Vector3) -> f32 {
        (self.x() * other.x()) + (self.y() * other.y()) + (self.z() * other.z())
    }

    pub fn squared_length(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.squared_length().sqrt()
    }

    pub fn normalized(self) -> Vector3 {
        self / self.length()
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3(BasicThreeTuple::new(
            (self.y() * other.z()) - (self.z() * other.y()),
            (self.z() * other.x()) - (self.x() * other.z()),
            (self.x() * other.y()) - (self.y() * other.x()),
        ))
    }

    // True when all three components sit within NEAR_ZERO of zero: a
    // degenerate direction that normalization would otherwise blow up on.
    pub fn near_zero(&self) -> bool {
        self.x().abs() < NEAR_ZERO && self.y().abs() < NEAR_ZERO && self.z().abs() < NEAR_ZERO
    }

    pub fn reflect(self, n: Vector3) -> Vector3 {
        self - 2.0_f32 * self.dot(n) * n
    }

    // `self` must be a unit vector; `eta_ratio` is n_incident / n_transmitted.
    pub fn refract(self, n: Vector3, eta_ratio: f32) -> Vector3 {
        let cos_theta = (-self).dot(n).min(1.0_f32);
        let r_out_perp = eta_ratio * (self + cos_theta * n);
        let r_out_parallel = -((1.0_f32 - r_out_perp.squared_length()).abs().sqrt()) * n;
        r_out_perp + r_out_parallel
    }

    pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vector3 {
        Vector3::new(
            rng.gen_range(min..max),
            rng.gen_range(min..max),
            rng.gen_range(min..max),
        )
    }

    pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
        loop {
            let v = Vector3::random_range(rng, -1.0_f32, 1.0_f32);
            if v.squared_length() < 1.0_f32 {
                return v;
            }
        }
    }

    pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
        Vector3::random_in_unit_sphere(rng).normalized()
    }

    pub fn random_in_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
        loop {
            let v = Vector3::new(rng.gen_range(-1.0_f32..1.0_f32), rng.gen_range(-1.0_f32..1.0_f32), 0.0_f32);
            if v.squared_length() < 1.0_f32 {
                return v;
            }
        }
    }
}

impl ops::Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0.add(rhs.0))
    }
}

impl ops::Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0.sub(rhs.0))
    }
}

impl ops::Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3(self.0.neg())
    }
}

impl ops::Mul for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3(self.0.mul(rhs.0))
    }
}

impl ops::Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, rhs: f32) -> Vector3 {
        Vector3(self.0.mul(rhs))
    }
}

impl ops::Mul<Vector3> for f32 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        Vector3(BasicThreeTuple::new(
            self * rhs.x(),
            self * rhs.y(),
            self * rhs.z(),
        ))
    }
}

impl ops::Div<f32> for Vector3 {
    type Output = Vector3;
    fn div(self, rhs: f32) -> Vector3 {
        Vector3(self.0.div(rhs))
    }
}

impl ops::Div<Vector3> for f32 {
    type Output = Vector3;
    fn div(self, rhs: Vector3) -> Vector3 {
        Vector3(BasicThreeTuple::new(
            self / rhs.x(),
            self / rhs.y(),
            self / rhs.z(),
        ))
    }
}

#[derive(Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Copy for Axis {}
impl Clone for Axis {
    fn clone(&self) -> Axis {
        *self
    }
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl ops::Index<Axis> for Vector3 {
    type Output = f32;
    fn index(&self, index: Axis) -> &f32 {
        match index {
            Axis::X => &self.0.x,
            Axis::Y => &self.0.y,
            Axis::Z => &self.0.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_product_is_perpendicular_to_both_inputs() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!(c.dot(a).abs() < 1e-6);
        assert!(c.dot(b).abs() < 1e-6);
        assert!((c.z() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vector3::new(3.0, 4.0, 0.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn near_zero_detects_degenerate_vector() {
        assert!(Vector3::new(0.0, 0.0, 0.0).near_zero());
        assert!(!Vector3::new(0.0, 1.0, 0.0).near_zero());
    }

    #[test]
    fn reflect_about_normal_flips_perpendicular_component() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        let n = Vector3::new(0.0, 1.0, 0.0);
        let r = v.reflect(n);
        assert!((r.x() - 1.0).abs() < 1e-6);
        assert!((r.y() - 1.0).abs() < 1e-6);
    }
}
