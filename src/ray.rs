use crate::point::Point3;
use crate::vector::Vector3;

// `dir` is normalized in `new` so that every downstream `t` is measured in
// true distance units; t_min/t_max are not stored here but threaded as
// parameters through `hit`, matching how every intersection routine in this
// crate consumes them.
pub struct Ray {
    pub origin: Point3,
    pub dir: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, dir: Vector3) -> Ray {
        Ray {
            origin,
            dir: dir.normalized(),
        }
    }

    pub fn point_at(&self, t: f32) -> Point3 {
        self.origin + (self.dir * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_direction() {
        let r = Ray::new(Point3::origin(), Vector3::new(3.0, 0.0, 0.0));
        assert!((r.dir.length() - 1.0).abs() < 1e-6);
        assert!((r.dir.x() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_at_follows_the_parametric_line() {
        let r = Ray::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let p = r.point_at(2.0);
        assert!((p.x() - 1.0).abs() < 1e-6);
        assert!((p.y() - 2.0).abs() < 1e-6);
    }
}
