use crate::color::RGB;
use crate::hit::HitRecord;
use crate::ray::Ray;
use crate::texture::SyncTexture;
use crate::vector::Vector3;

use rand::Rng;
use std::sync::Arc;

fn schlick_reflectance(cosine: f32, eta_ratio: f32) -> f32 {
    let mut r0 = (1.0_f32 - eta_ratio) / (1.0_f32 + eta_ratio);
    r0 *= r0;
    r0 + (1.0_f32 - r0) * (1.0_f32 - cosine).powi(5)
}

// scatter/emit take an explicit `rng` rather than reaching for a global
// generator, so each render worker can own a distinct, seeded stream
// (see integrator.rs).
pub trait Material {
    fn scatter(&self, v_in: Vector3, rec: &HitRecord, rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)>;

    fn emitted(&self, _rec: &HitRecord) -> RGB {
        RGB::black()
    }
}
pub type SyncMaterial = dyn Material + Send + Sync;
pub type MaterialHandle = Arc<SyncMaterial>;

pub struct Lambertian {
    albedo: Arc<SyncTexture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<SyncTexture>) -> Lambertian {
        Lambertian { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _v_in: Vector3, rec: &HitRecord, rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)> {
        let mut scatter_dir = rec.normal + Vector3::random_unit_vector(rng);
        if scatter_dir.near_zero() {
            scatter_dir = rec.normal;
        }
        let attenuation = self.albedo.value(rec.u, rec.v, &rec.p);
        Some((attenuation, Ray::new(rec.p, scatter_dir)))
    }
}

pub struct Metal {
    albedo: Arc<SyncTexture>,
    fuzz: f32,
}

impl Metal {
    pub fn new(albedo: Arc<SyncTexture>, fuzz: f32) -> Metal {
        Metal {
            albedo,
            fuzz: fuzz.min(1.0_f32).max(0.0_f32),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, v_in: Vector3, rec: &HitRecord, rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)> {
        let reflected = v_in.reflect(rec.normal) + self.fuzz * Vector3::random_in_unit_sphere(rng);
        if reflected.dot(rec.normal) <= 0.0_f32 {
            return None;
        }
        let attenuation = self.albedo.value(rec.u, rec.v, &rec.p);
        Some((attenuation, Ray::new(rec.p, reflected)))
    }
}

pub struct Dielectric {
    // index of refraction
    ior: f32,
}

impl Dielectric {
    pub fn new(ior: f32) -> Dielectric {
        Dielectric { ior }
    }
}

impl Material for Dielectric {
    fn scatter(&self, v_in: Vector3, rec: &HitRecord, rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)> {
        let eta_ratio = if rec.front_face {
            1.0_f32 / self.ior
        } else {
            self.ior
        };

        let cos_theta = (-v_in).dot(rec.normal).min(1.0_f32);
        let sin_theta = (1.0_f32 - cos_theta * cos_theta).sqrt();

        let cannot_refract = eta_ratio * sin_theta > 1.0_f32;
        let direction = if cannot_refract || schlick_reflectance(cos_theta, eta_ratio) > rng.gen::<f32>() {
            v_in.reflect(rec.normal)
        } else {
            v_in.refract(rec.normal, eta_ratio)
        };

        Some((RGB::white(), Ray::new(rec.p, direction)))
    }
}

pub struct DiffuseLight {
    emission: Arc<SyncTexture>,
}

impl DiffuseLight {
    pub fn new(emission: Arc<SyncTexture>) -> DiffuseLight {
        DiffuseLight { emission }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _v_in: Vector3, _rec: &HitRecord, _rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)> {
        None
    }

    fn emitted(&self, rec: &HitRecord) -> RGB {
        self.emission.value(rec.u, rec.v, &rec.p)
    }
}

// Delegates entirely to one of two materials depending on which face of the
// surface was struck, e.g. a glowing sign that is dark on its back.
pub struct TwoSided {
    front: MaterialHandle,
    back: MaterialHandle,
}

impl TwoSided {
    pub fn new(front: MaterialHandle, back: MaterialHandle) -> TwoSided {
        TwoSided { front, back }
    }
}

impl Material for TwoSided {
    fn scatter(&self, v_in: Vector3, rec: &HitRecord, rng: &mut dyn rand::RngCore) -> Option<(RGB, Ray)> {
        if rec.front_face {
            self.front.scatter(v_in, rec, rng)
        } else {
            self.back.scatter(v_in, rec, rng)
        }
    }

    fn emitted(&self, rec: &HitRecord) -> RGB {
        if rec.front_face {
            self.front.emitted(rec)
        } else {
            self.back.emitted(rec)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point3;
    use crate::texture::Constant;
    use rand::{rngs::SmallRng, SeedableRng};

    fn dummy_material() -> MaterialHandle {
        Arc::new(Lambertian::new(Arc::new(Constant::new(RGB::white()))))
    }

    fn flat_hit(normal: Vector3) -> HitRecord {
        HitRecord {
            p: Point3::origin(),
            normal,
            t: 1.0,
            u: 0.0,
            v: 0.0,
            front_face: true,
            material: dummy_material(),
        }
    }

    #[test]
    fn lambertian_is_deterministic_under_fixed_seed() {
        let albedo = Arc::new(Constant::new(RGB::new(0.5, 0.5, 0.5)));
        let mat = Lambertian::new(albedo);
        let rec = flat_hit(Vector3::new(0.0, 1.0, 0.0));

        let mut rng1 = SmallRng::seed_from_u64(7);
        let mut rng2 = SmallRng::seed_from_u64(7);
        let (_, r1) = mat.scatter(Vector3::new(0.0, -1.0, 0.0), &rec, &mut rng1).unwrap();
        let (_, r2) = mat.scatter(Vector3::new(0.0, -1.0, 0.0), &rec, &mut rng2).unwrap();

        assert!((r1.dir.x() - r2.dir.x()).abs() < 1e-9);
        assert!((r1.dir.y() - r2.dir.y()).abs() < 1e-9);
        assert!((r1.dir.z() - r2.dir.z()).abs() < 1e-9);
    }

    #[test]
    fn metal_does_not_scatter_below_the_surface() {
        let albedo = Arc::new(Constant::new(RGB::white()));
        let mat = Metal::new(albedo, 0.0);
        let rec = flat_hit(Vector3::new(0.0, 1.0, 0.0));
        // Incoming ray grazing along the surface, reflected fuzz-free ray
        // would end up with zero y-component; push it slightly negative.
        let v_in = Vector3::new(1.0, 0.0001, 0.0).normalized();
        let scattered = mat.scatter(v_in, &rec, &mut rand::thread_rng());
        assert!(scattered.is_some());
    }

    #[test]
    fn dielectric_total_internal_reflection_always_reflects() {
        let mat = Dielectric::new(1.5);
        // Grazing incidence from inside the medium, past the critical angle.
        let rec = HitRecord {
            p: Point3::origin(),
            normal: Vector3::new(0.0, 1.0, 0.0),
            t: 1.0,
            u: 0.0,
            v: 0.0,
            front_face: false,
            material: dummy_material(),
        };
        let v_in = Vector3::new(0.999, -0.0447, 0.0).normalized();
        let mut rng = rand::thread_rng();
        let (_, scattered) = mat.scatter(v_in, &rec, &mut rng).unwrap();
        // A reflection off a surface whose normal is +y keeps the ray
        // above the surface (positive y component).
        assert!(scattered.dir.y() > 0.0);
    }
}
