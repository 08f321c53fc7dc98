use crate::interaction::HitRecord;
use crate::math::{Vec2, Vec3};
use crate::ray::Ray;

/// Surface epsilon: the minimum accepted hit `t`, chosen to skip
/// self-intersection of bounce rays leaving the surface they scattered off
/// of. Named `EPSILON_S` in the spec.
pub const EPSILON_S: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: usize,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Ray-sphere intersection per §4.3: substitute the ray into
    /// `|p - c|^2 = r^2`, solve the resulting quadratic in `t`, and accept
    /// the smallest positive root above [`EPSILON_S`].
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let mut t = (-half_b - sqrt_d) / a;
        if t <= EPSILON_S {
            t = (-half_b + sqrt_d) / a;
            if t <= EPSILON_S {
                return None;
            }
        }

        let point = ray.at(t);
        let normal = (point - self.center) * (1.0 / self.radius);

        // Spherical surface parametrization: theta over the poles, phi
        // around the equator, both normalized to [0, 1].
        let phi = (-normal.z).atan2(normal.x) + std::f32::consts::PI;
        let theta = normal.y.clamp(-1.0, 1.0).acos();
        let uv = Vec2::new(
            phi / std::f32::consts::TAU,
            theta / std::f32::consts::PI,
        );

        Some(HitRecord {
            t,
            point,
            normal,
            uv,
            material: self.material,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::RayKind;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hits_sphere_head_on() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), RayKind::Incident);
        let hit = sphere.intersect(&ray).expect("ray should hit sphere");
        assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn misses_sphere_off_axis() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, 0);
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 5.0, 1.0).normalized(), RayKind::Incident);
        assert!(sphere.intersect(&ray).is_none());
    }

    #[test]
    fn rejects_hits_behind_epsilon() {
        let sphere = Sphere::new(Vec3::zeros(), 1.0, 0);
        // Ray starting exactly on the surface, pointing outward: both roots
        // fall at or below the surface epsilon.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0), RayKind::Reflected);
        assert!(sphere.intersect(&ray).is_none());
    }
}
