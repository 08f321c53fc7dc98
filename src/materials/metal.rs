use super::bsdfs::specular;
use crate::interaction::HitRecord;
use crate::math::{Spectrum, Vec3};
use crate::ray::{Ray, RayKind};
use crate::sampling::Sampler;

/// A specular reflector with a roughness-like `fuzz` term: the mirror
/// direction is perturbed by a sample from a small sphere scaled by `fuzz`,
/// the classic cheap glossy-metal trick (not a microfacet model).
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    pub albedo: Spectrum,
    pub fuzz: f32,
}

impl Metal {
    pub fn emitted(&self) -> Spectrum {
        Spectrum::zeros()
    }

    /// `incident_direction` is the incoming ray's direction (pointing into
    /// the surface, the way `Ray::direction` is stored).
    pub fn scatter(
        &self,
        hit: &HitRecord,
        incident_direction: Vec3,
        sampler: &mut Sampler,
    ) -> Option<(Ray, Spectrum)> {
        let n = hit.normal;
        let wi = -incident_direction;
        let mirror = specular::reflect(wi, n);
        let wo = if self.fuzz > 0.0 {
            let (t, b) = Vec3::coordinate_system(mirror);
            let jitter = super::bsdfs::cosine_sample_hemisphere(
                sampler.get_dimension(),
                sampler.get_dimension(),
            );
            (mirror + (t * jitter.x + b * jitter.y) * self.fuzz).normalized()
        } else {
            mirror
        };

        if wo.dot(n) <= 0.0 {
            // Fuzz perturbed the ray below the surface; absorb.
            return None;
        }

        let ray = Ray::new(hit.point, wo, RayKind::Reflected);
        Some((ray, self.albedo))
    }
}
